//! Materializes the offer letter template on disk.
//!
//! The template can be shipped as a base64 secret. It is decoded to the
//! cache path on first run only; an existing file is never overwritten.

use base64::Engine as _;
use std::path::Path;

use super::service::DocumentResult;

/// Outcome of [`ensure_template_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateSource {
    /// The cache file already existed.
    Cached,
    /// The cache file was written from the encoded secret.
    Decoded,
}

/// Decodes standard base64, ignoring embedded whitespace and line breaks.
pub fn decode_template(encoded: &str) -> DocumentResult<Vec<u8>> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(base64::engine::general_purpose::STANDARD.decode(compact)?)
}

/// Makes sure a template file exists at `path`.
///
/// # Errors
///
/// Returns an I/O `NotFound` error if the file is missing and no encoded
/// template was supplied, or a decode error if the secret is not base64.
pub async fn ensure_template_file(
    path: &Path,
    encoded: Option<&str>,
) -> DocumentResult<TemplateSource> {
    if tokio::fs::try_exists(path).await? {
        tracing::debug!(path = %path.display(), "Using cached offer template");
        return Ok(TemplateSource::Cached);
    }

    let Some(encoded) = encoded else {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!(
                "template {} does not exist and TEMPLATE_BASE64 is not set",
                path.display()
            ),
        )
        .into());
    };

    let bytes = decode_template(encoded)?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, &bytes).await?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "Offer template decoded to cache");
    Ok(TemplateSource::Decoded)
}

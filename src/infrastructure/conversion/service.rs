//! Document conversion trait and error types.

use async_trait::async_trait;

/// Errors returned by the conversion service.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("conversion service request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("conversion service URL is invalid: {0}")]
    Url(#[from] url::ParseError),
    #[error("conversion service authentication failed ({status}): {body}")]
    Auth { status: u16, body: String },
    #[error("{step} failed with status {status}: {body}")]
    Api {
        step: &'static str,
        status: u16,
        body: String,
    },
}

/// Result type for conversion operations.
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Output formats the pipeline requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    Pdf,
}

impl TargetFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetFormat::Pdf => "pdf",
        }
    }

    pub fn extension(self) -> &'static str {
        self.as_str()
    }
}

/// Remote document conversion service.
///
/// Paths are relative to the service's storage root and may include folders.
///
/// # Implementations
///
/// - [`crate::infrastructure::conversion::AsposeConverter`] - Aspose Words Cloud v4
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    /// Uploads `bytes` to `path` in remote storage.
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> ConversionResult<()>;

    /// Converts the stored document at `source` and saves the result at `target`.
    async fn save_as(&self, source: &str, target: &str, format: TargetFormat)
    -> ConversionResult<()>;

    /// Downloads the raw bytes stored at `path`.
    async fn download(&self, path: &str) -> ConversionResult<Vec<u8>>;
}

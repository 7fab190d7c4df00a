//! Document renderer trait and error types.

use async_trait::async_trait;
use std::collections::BTreeMap;

/// Errors that can occur while rendering an offer letter.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("template archive is unreadable: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("template I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("embedded template is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("image could not be read: {0}")]
    Image(#[from] image::ImageError),
    #[error("template part `{0}` is missing")]
    MissingPart(&'static str),
    #[error("template part `{0}` is not valid UTF-8")]
    Encoding(String),
    #[error("image anchor not found: {0}")]
    AnchorNotFound(String),
    #[error("unterminated placeholder starting at byte {0}")]
    UnterminatedPlaceholder(usize),
}

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Location of an image inserted after rendering.
///
/// Indices are zero-based: the `cell`-th cell of the `row`-th row of the
/// `table`-th table in the document body. The image goes into the cell's
/// first paragraph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageAnchor {
    pub table: usize,
    pub row: usize,
    pub cell: usize,
    /// Rendered width in inches; height follows the image aspect ratio.
    pub width_inches: f64,
}

impl ImageAnchor {
    /// Where the offer letter template expects its QR code.
    pub const OFFER_QR: ImageAnchor = ImageAnchor {
        table: 0,
        row: 0,
        cell: 2,
        width_inches: 1.5,
    };
}

/// Renders offer letters from a pre-configured template.
///
/// # Implementations
///
/// - [`crate::infrastructure::document::DocxRenderer`] - DOCX placeholder renderer
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    /// Fills the template's placeholders with `fields` and returns the document bytes.
    ///
    /// Placeholders with no matching field render as empty text.
    async fn render(&self, fields: &BTreeMap<String, String>) -> DocumentResult<Vec<u8>>;

    /// Inserts a PNG image at `anchor` in an already rendered document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::AnchorNotFound`] if the document has no such cell.
    async fn embed_image(
        &self,
        document: &[u8],
        png: &[u8],
        anchor: ImageAnchor,
    ) -> DocumentResult<Vec<u8>>;

    /// Returns true if a template is loaded and readable.
    fn is_ready(&self) -> bool;
}

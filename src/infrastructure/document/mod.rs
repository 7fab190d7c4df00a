//! Offer letter rendering.
//!
//! Provides a [`DocumentRenderer`] trait with one implementation:
//! - [`DocxRenderer`] - Fills `{{ name }}` placeholders in a DOCX template and
//!   embeds images into table cells

mod docx_renderer;
mod service;
pub mod template_cache;

pub use docx_renderer::{DocxRenderer, fill_placeholders};
pub use service::{DocumentError, DocumentRenderer, DocumentResult, ImageAnchor};
pub use template_cache::{TemplateSource, ensure_template_file};

#[cfg(test)]
pub use service::MockDocumentRenderer;

//! DOCX to PDF conversion through a remote service.
//!
//! Provides a [`DocumentConverter`] trait with one implementation:
//! - [`AsposeConverter`] - Aspose Words Cloud REST client

mod aspose_converter;
mod service;

pub use aspose_converter::AsposeConverter;
pub use service::{ConversionError, ConversionResult, DocumentConverter, TargetFormat};

#[cfg(test)]
pub use service::MockDocumentConverter;

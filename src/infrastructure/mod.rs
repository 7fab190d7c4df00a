//! Infrastructure layer for external integrations.
//!
//! Each collaborator of the submission pipeline sits behind a trait so the
//! pipeline can run against fakes.
//!
//! # Modules
//!
//! - [`persistence`] - CSV file and Google Sheets record stores
//! - [`document`] - DOCX template rendering and QR image embedding
//! - [`conversion`] - Remote DOCX to PDF conversion
//! - [`mail`] - SMTP delivery
//! - [`artifacts`] - Local storage of generated PDFs
//! - [`oauth`] - Bearer token caching shared by the HTTP clients

pub mod artifacts;
pub mod conversion;
pub mod document;
pub mod mail;
pub mod oauth;
pub mod persistence;

//! # Offer Portal
//!
//! Internship offer letter service built with Axum.
//!
//! An intern submits a short form; the service logs the record, fills a DOCX
//! template with the details and a verification QR code, converts it to PDF
//! through a conversion service and emails the letter.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Offer entities, submission lifecycle and the record store trait
//! - **Application Layer** ([`application`]) - Submission pipeline and admin services
//! - **Infrastructure Layer** ([`infrastructure`]) - Record stores, rendering, conversion, mail
//! - **API Layer** ([`api`]) - JSON handlers, DTOs, and middleware
//! - **Web Layer** ([`web`]) - HTML offer form and admin pages
//!
//! ## Features
//!
//! - DOCX placeholder filling with an embedded verification QR code
//! - Remote DOCX to PDF conversion and SMTP delivery
//! - CSV file or Google Sheets record storage
//! - Admin read-back, CSV export and bulk replacement
//! - Rate limiting and structured logging
//!
//! ## Quick Start
//!
//! ```bash
//! export ADMIN_KEY="change-me"
//! export SMTP_USER="offers@example.com" SMTP_PASSWORD="app-password"
//! export ASPOSE_CLIENT_ID="..." ASPOSE_CLIENT_SECRET="..."
//! export TEMPLATE_BASE64="$(base64 -w0 offer_template.docx)"
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;
pub mod web;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{AdminService, OfferService, OfferSettings};
    pub use crate::domain::entities::{OfferForm, OfferRecord, RecordTable};
    pub use crate::domain::repositories::RecordRepository;
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}

//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod admin;
pub mod health;
pub mod offers;

pub use admin::{export_records_handler, list_records_handler, replace_records_handler};
pub use health::health_handler;
pub use offers::{create_offer_handler, offer_pdf_handler};

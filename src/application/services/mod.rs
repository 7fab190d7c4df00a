//! Business logic services for the application layer.

pub mod admin_service;
pub mod offer_service;

pub use admin_service::AdminService;
pub use offer_service::{OfferService, OfferSettings, SubmissionError};

//! Application layer services implementing business logic.
//!
//! Services orchestrate collaborator traits from the infrastructure layer and
//! repository traits from the domain layer, and provide a clean API for HTTP
//! handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::offer_service::OfferService`] - Offer letter submission pipeline
//! - [`services::admin_service::AdminService`] - Admin key checks and record read-back

pub mod services;

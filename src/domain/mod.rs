//! Domain layer: offer entities, the submission lifecycle and repository traits.
//!
//! - [`entities`] - Form input, offer record, record table
//! - [`submission`] - Submission stages, warnings and receipts
//! - [`repositories`] - Record store trait
//!
//! The domain layer has no dependencies on infrastructure or presentation layers.

pub mod entities;
pub mod repositories;
pub mod submission;

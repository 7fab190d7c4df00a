//! Core domain entities.
//!
//! - [`OfferForm`] - Raw form input, validated in a fixed order
//! - [`OfferRecord`] - Immutable accepted submission
//! - [`RecordTable`] - Raw read-back of the record store

pub mod offer;

pub use offer::{OfferForm, OfferRecord, RECORD_COLUMNS, RecordTable, Rejection, standard_header};

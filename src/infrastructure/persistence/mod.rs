//! Record store implementations.
//!
//! Concrete implementations of [`crate::domain::repositories::RecordRepository`].
//! One backend is selected at startup from configuration.
//!
//! # Repositories
//!
//! - [`CsvRecordRepository`] - Local CSV file with a header row
//! - [`SheetsRecordRepository`] - Google Sheets via the `values` API

pub mod csv_record_repository;
pub mod sheets_record_repository;

pub use csv_record_repository::CsvRecordRepository;
pub use sheets_record_repository::{ServiceAccountKey, SheetsError, SheetsRecordRepository};

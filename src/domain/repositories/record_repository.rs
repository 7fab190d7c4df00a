//! Repository trait for the append-only offer record store.

use crate::domain::entities::{OfferRecord, RecordTable};
use crate::error::AppError;
use async_trait::async_trait;

/// Append-only store of offer records.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::CsvRecordRepository`] - Local CSV file
/// - [`crate::infrastructure::persistence::SheetsRecordRepository`] - Google Sheets
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Appends one record.
    ///
    /// When the store does not exist yet it is created with the header row first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store cannot be written.
    async fn append(&self, record: &OfferRecord) -> Result<(), AppError>;

    /// Reads back the whole store.
    ///
    /// A store that does not exist yet reads as [`RecordTable::empty`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store cannot be read or parsed.
    async fn read_all(&self) -> Result<RecordTable, AppError>;

    /// Replaces the whole store with `table`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store cannot be written.
    async fn replace_all(&self, table: RecordTable) -> Result<(), AppError>;

    /// Checks that the backing store is reachable.
    async fn health_check(&self) -> bool;

    /// Short backend name used in logs and health output.
    fn backend_name(&self) -> &'static str;
}

//! Administrative access to the record store.

use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::entities::{RECORD_COLUMNS, RecordTable};
use crate::domain::repositories::RecordRepository;
use crate::error::AppError;
use crate::infrastructure::persistence::csv_record_repository::{parse_table, write_table};

type HmacSha256 = Hmac<Sha256>;

/// Length in bytes of the per-process session secret.
pub const SESSION_SECRET_LEN: usize = 32;

/// Generates a fresh secret for signing admin sessions.
pub fn generate_session_secret() -> Result<[u8; SESSION_SECRET_LEN], getrandom::Error> {
    let mut secret = [0u8; SESSION_SECRET_LEN];
    getrandom::fill(&mut secret)?;
    Ok(secret)
}

/// Service gating the record store behind a shared admin key.
///
/// Keys are compared through HMAC-SHA256 tags keyed by a per-process secret,
/// so comparison time does not depend on where the presented key differs.
/// The same secret signs web session cookies; sessions therefore end when the
/// process restarts.
pub struct AdminService {
    records: Arc<dyn RecordRepository>,
    admin_key: String,
    session_secret: [u8; SESSION_SECRET_LEN],
}

impl AdminService {
    /// Creates a new admin service.
    ///
    /// # Arguments
    ///
    /// - `records` - record store to read back and replace
    /// - `admin_key` - shared key; an empty key disables admin access
    /// - `session_secret` - HMAC key, see [`generate_session_secret`]
    pub fn new(
        records: Arc<dyn RecordRepository>,
        admin_key: String,
        session_secret: [u8; SESSION_SECRET_LEN],
    ) -> Self {
        Self {
            records,
            admin_key,
            session_secret,
        }
    }

    fn mac(&self) -> HmacSha256 {
        <HmacSha256 as Mac>::new_from_slice(&self.session_secret)
            .expect("HMAC accepts any key length")
    }

    fn tag(&self, domain: &[u8], value: &str) -> Vec<u8> {
        let mut mac = self.mac();
        mac.update(domain);
        mac.update(value.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }

    fn matches(&self, domain: &[u8], presented: &str, expected: &[u8]) -> bool {
        let mut mac = self.mac();
        mac.update(domain);
        mac.update(presented.as_bytes());
        mac.verify_slice(expected).is_ok()
    }

    /// Checks a presented admin key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the key is empty, admin access is
    /// disabled, or the key does not match.
    pub fn authenticate(&self, key: &str) -> Result<(), AppError> {
        if key.is_empty() || self.admin_key.is_empty() {
            return Err(unauthorized());
        }

        let expected = self.tag(b"admin-key:", &self.admin_key);
        if !self.matches(b"admin-key:", key, &expected) {
            tracing::warn!("Rejected admin key");
            return Err(unauthorized());
        }

        Ok(())
    }

    /// Cookie value proving a successful login.
    pub fn session_token(&self) -> String {
        hex::encode(self.tag(b"admin-session:", &self.admin_key))
    }

    /// Returns true if `token` was issued by [`Self::session_token`] in this process.
    pub fn verify_session(&self, token: &str) -> bool {
        if self.admin_key.is_empty() {
            return false;
        }
        let Ok(tag) = hex::decode(token) else {
            return false;
        };

        let mut mac = self.mac();
        mac.update(b"admin-session:");
        mac.update(self.admin_key.as_bytes());
        mac.verify_slice(&tag).is_ok()
    }

    /// Reads back every logged record.
    pub async fn list_records(&self) -> Result<RecordTable, AppError> {
        self.records.read_all().await
    }

    /// Exports the store as CSV, header first.
    pub async fn export_csv(&self) -> Result<Vec<u8>, AppError> {
        let table = self.records.read_all().await?;
        write_table(&table).map_err(|e| {
            tracing::error!(error = %e, "Failed to serialize records");
            AppError::internal("Failed to export records", json!({}))
        })
    }

    /// Replaces the whole store with an uploaded CSV file.
    ///
    /// Returns the number of data rows written.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if:
    /// - The file is not valid CSV
    /// - The header is not exactly the record columns
    /// - Any row has a different number of fields than the header
    pub async fn replace_records(&self, csv_bytes: &[u8]) -> Result<usize, AppError> {
        let table = parse_table(csv_bytes).map_err(|e| {
            AppError::bad_request("Uploaded file is not valid CSV", json!({ "reason": e.to_string() }))
        })?;

        if !table.has_standard_header() {
            return Err(AppError::bad_request(
                "Unexpected CSV header",
                json!({ "expected": RECORD_COLUMNS, "found": table.header }),
            ));
        }

        if let Some((index, row)) = table
            .rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != table.header.len())
        {
            return Err(AppError::bad_request(
                "Row width does not match header",
                json!({
                    "row": index + 1,
                    "expected": table.header.len(),
                    "found": row.len(),
                }),
            ));
        }

        let count = table.rows.len();
        self.records.replace_all(table).await?;
        tracing::info!(rows = count, "Record store replaced");

        Ok(count)
    }
}

fn unauthorized() -> AppError {
    AppError::unauthorized("Unauthorized", json!({ "reason": "Invalid admin key" }))
}

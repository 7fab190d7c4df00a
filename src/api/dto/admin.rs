//! DTOs for admin record endpoints.

use serde::Serialize;

use crate::domain::entities::RecordTable;

/// Raw read-back of the record store.
#[derive(Debug, Serialize)]
pub struct RecordTableResponse {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total: usize,
}

impl From<RecordTable> for RecordTableResponse {
    fn from(table: RecordTable) -> Self {
        Self {
            total: table.rows.len(),
            header: table.header,
            rows: table.rows,
        }
    }
}

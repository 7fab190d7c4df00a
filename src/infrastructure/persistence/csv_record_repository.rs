//! CSV file implementation of the record repository.

use async_trait::async_trait;
use serde_json::json;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::entities::{OfferRecord, RecordTable, standard_header};
use crate::domain::repositories::RecordRepository;
use crate::error::AppError;

/// Record store backed by a local CSV file.
///
/// The first row is the header. Appends and replacements are serialized
/// through an async mutex and run on the blocking thread pool.
pub struct CsvRecordRepository {
    path: Arc<PathBuf>,
    lock: Mutex<()>,
}

impl CsvRecordRepository {
    /// Creates a repository writing to `path`. The file is created lazily.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parses CSV bytes into a table. The first row is the header.
pub fn parse_table(bytes: &[u8]) -> Result<RecordTable, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    let mut rows = rows.into_iter();
    let header = rows.next().unwrap_or_default();

    Ok(RecordTable {
        header,
        rows: rows.collect(),
    })
}

/// Serializes a table to CSV bytes, header first.
pub fn write_table(table: &RecordTable) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(&table.header)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

fn append_row(path: &Path, row: &[String]) -> Result<(), csv::Error> {
    let needs_header = match fs::metadata(path) {
        Ok(meta) => meta.len() == 0,
        Err(e) if e.kind() == io::ErrorKind::NotFound => true,
        Err(e) => return Err(e.into()),
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    if needs_header {
        writer.write_record(standard_header())?;
    }
    writer.write_record(row)?;
    writer.flush()?;

    Ok(())
}

fn read_table(path: &Path) -> Result<RecordTable, csv::Error> {
    match fs::read(path) {
        Ok(bytes) if bytes.is_empty() => Ok(RecordTable::empty()),
        Ok(bytes) => parse_table(&bytes),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(RecordTable::empty()),
        Err(e) => Err(e.into()),
    }
}

fn replace_file(path: &Path, table: &RecordTable) -> Result<(), csv::Error> {
    let bytes = write_table(table)?;
    let staging = path.with_extension("csv.tmp");

    fs::write(&staging, bytes)?;
    fs::rename(&staging, path)?;

    Ok(())
}

fn storage_error(operation: &'static str, e: impl std::fmt::Display) -> AppError {
    tracing::error!(operation, error = %e, "CSV record store error");
    AppError::internal(
        "Record store error",
        json!({ "backend": "csv", "operation": operation }),
    )
}

fn join_error(e: tokio::task::JoinError) -> AppError {
    storage_error("join", e)
}

#[async_trait]
impl RecordRepository for CsvRecordRepository {
    async fn append(&self, record: &OfferRecord) -> Result<(), AppError> {
        let _guard = self.lock.lock().await;
        let path = self.path.clone();
        let row = record.to_row();

        tokio::task::spawn_blocking(move || append_row(&path, &row))
            .await
            .map_err(join_error)?
            .map_err(|e| storage_error("append", e))
    }

    async fn read_all(&self) -> Result<RecordTable, AppError> {
        let _guard = self.lock.lock().await;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || read_table(&path))
            .await
            .map_err(join_error)?
            .map_err(|e| storage_error("read", e))
    }

    async fn replace_all(&self, table: RecordTable) -> Result<(), AppError> {
        let _guard = self.lock.lock().await;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || replace_file(&path, &table))
            .await
            .map_err(join_error)?
            .map_err(|e| storage_error("replace", e))
    }

    async fn health_check(&self) -> bool {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => tokio::fs::metadata(dir)
                .await
                .map(|m| m.is_dir())
                .unwrap_or(false),
            _ => true,
        }
    }

    fn backend_name(&self) -> &'static str {
        "csv"
    }
}

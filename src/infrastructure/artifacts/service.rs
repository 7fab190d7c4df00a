//! Artifact store trait and error types.

use async_trait::async_trait;

/// Errors raised by an artifact store.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("artifact I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid artifact file name `{0}`")]
    InvalidName(String),
}

/// Result type for artifact operations.
pub type ArtifactResult<T> = Result<T, ArtifactError>;

/// A stored file together with its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Stores one generated document per intern ID.
///
/// # Implementations
///
/// - [`crate::infrastructure::artifacts::LocalArtifactStore`] - Local filesystem
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Saves `bytes` as `file_name` under `intern_id`, replacing earlier files.
    async fn save(&self, intern_id: &str, file_name: &str, bytes: &[u8]) -> ArtifactResult<()>;

    /// Loads the document stored under `intern_id`, if any.
    async fn load(&self, intern_id: &str) -> ArtifactResult<Option<StoredArtifact>>;
}

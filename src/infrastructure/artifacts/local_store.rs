//! Filesystem artifact store.
//!
//! Layout: `<root>/<intern_id>/<file_name>`. Each directory holds a single
//! PDF, so concurrent submissions with the same intern name never collide.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::service::{ArtifactError, ArtifactResult, ArtifactStore, StoredArtifact};

/// Artifact store rooted at a local work directory.
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    root: PathBuf,
}

impl LocalArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn dir_for(&self, intern_id: &str) -> PathBuf {
        self.root.join(intern_id)
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn save(&self, intern_id: &str, file_name: &str, bytes: &[u8]) -> ArtifactResult<()> {
        if !is_plain_file_name(intern_id) {
            return Err(ArtifactError::InvalidName(intern_id.to_string()));
        }
        if !is_plain_file_name(file_name) {
            return Err(ArtifactError::InvalidName(file_name.to_string()));
        }

        let dir = self.dir_for(intern_id);
        tokio::fs::create_dir_all(&dir).await?;

        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() && entry.file_name() != file_name {
                tokio::fs::remove_file(entry.path()).await?;
            }
        }

        tokio::fs::write(dir.join(file_name), bytes).await?;
        tracing::debug!(intern_id, file_name, size = bytes.len(), "Stored artifact");
        Ok(())
    }

    async fn load(&self, intern_id: &str) -> ArtifactResult<Option<StoredArtifact>> {
        if !is_plain_file_name(intern_id) {
            return Ok(None);
        }

        let mut entries = match tokio::fs::read_dir(self.dir_for(intern_id)).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let bytes = tokio::fs::read(entry.path()).await?;
            return Ok(Some(StoredArtifact { file_name, bytes }));
        }

        Ok(None)
    }
}

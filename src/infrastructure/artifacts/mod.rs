//! Storage for generated offer PDFs.
//!
//! Provides an [`ArtifactStore`] trait with one implementation:
//! - [`LocalArtifactStore`] - One directory per intern ID under a work root

mod local_store;
mod service;

pub use local_store::LocalArtifactStore;
pub use service::{ArtifactError, ArtifactResult, ArtifactStore, StoredArtifact};

#[cfg(test)]
pub use service::MockArtifactStore;

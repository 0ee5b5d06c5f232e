use async_trait::async_trait;

use crate::domain::ArtifactKey;

/// Blob store port for finished caption files, keyed by job id + format.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn put(&self, key: &ArtifactKey, data: Vec<u8>) -> Result<(), ArtifactStoreError>;

    async fn get(&self, key: &ArtifactKey) -> Result<Vec<u8>, ArtifactStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactStoreError {
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("download failed: {0}")]
    DownloadFailed(String),
}

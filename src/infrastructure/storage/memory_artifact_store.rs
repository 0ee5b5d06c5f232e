use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::application::ports::{ArtifactStore, ArtifactStoreError};
use crate::domain::ArtifactKey;

/// In-memory artifact store for tests and scaffold wiring.
#[derive(Default)]
pub struct MemoryArtifactStore {
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn put(&self, key: &ArtifactKey, data: Vec<u8>) -> Result<(), ArtifactStoreError> {
        self.objects
            .write()
            .await
            .insert(key.as_str().to_string(), data);
        Ok(())
    }

    async fn get(&self, key: &ArtifactKey) -> Result<Vec<u8>, ArtifactStoreError> {
        self.objects
            .read()
            .await
            .get(key.as_str())
            .cloned()
            .ok_or_else(|| ArtifactStoreError::NotFound(key.to_string()))
    }
}

use std::sync::Arc;

use crate::application::ports::{
    ArtifactStore, ArtifactStoreError, JobRepository, Provider, ProviderError, RepositoryError,
};
use crate::domain::{ArtifactKey, JobId, JobStatus};

use super::ProviderRegistry;

/// Serves finished caption artifacts, caching them in the artifact store so
/// repeated downloads skip the vendor round trip.
pub struct CaptionRetrieval {
    registry: Arc<ProviderRegistry>,
    repository: Arc<dyn JobRepository>,
    store: Arc<dyn ArtifactStore>,
}

impl CaptionRetrieval {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        repository: Arc<dyn JobRepository>,
        store: Arc<dyn ArtifactStore>,
    ) -> Self {
        Self {
            registry,
            repository,
            store,
        }
    }

    /// Download the caption for a delivered job. Jobs that are not yet
    /// delivered fail fast with `NotReady` before any vendor call: some
    /// vendors hand back in-progress drafts, and callers must not mistake
    /// those for final output.
    pub async fn download_caption(
        &self,
        job_id: JobId,
        format: &str,
    ) -> Result<Vec<u8>, RetrievalError> {
        let job = self
            .repository
            .get(job_id)
            .await?
            .ok_or(RetrievalError::NotFound(job_id))?;

        if job.status != JobStatus::Delivered {
            return Err(RetrievalError::NotReady {
                job_id,
                status: job.status,
            });
        }

        let key = ArtifactKey::new(job_id, format);
        if let Ok(cached) = self.store.get(&key).await {
            tracing::debug!(key = %key, "Serving caption from artifact store");
            return Ok(cached);
        }

        let provider = self
            .registry
            .get(&job.provider_name)
            .ok_or_else(|| RetrievalError::UnknownProvider(job.provider_name.clone()))?;
        let provider_id = job
            .provider_id()
            .ok_or(RetrievalError::MissingProviderId(job_id))?;

        let data = provider.download(provider_id, format).await?;

        if let Err(e) = self.store.put(&key, data.clone()).await {
            tracing::warn!(key = %key, error = %e, "Failed to cache caption artifact");
        }

        Ok(data)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("job not found: {0}")]
    NotFound(JobId),
    #[error("captions for job {job_id} not ready: status is {status}")]
    NotReady { job_id: JobId, status: JobStatus },
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
    #[error("job {0} has no vendor-assigned identifier")]
    MissingProviderId(JobId),
    #[error("vendor call failed: {0}")]
    VendorCallFailed(#[from] ProviderError),
    #[error("persistence: {0}")]
    Persistence(#[from] RepositoryError),
    #[error("artifact store: {0}")]
    Store(#[from] ArtifactStoreError),
}

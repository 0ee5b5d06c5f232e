use std::collections::HashMap;
use std::sync::Arc;

use crate::application::ports::{JobRepository, Provider, ProviderError, RepositoryError};
use crate::domain::{Job, JobId, JobStatus};

use super::ProviderRegistry;

/// What a caller asks for when creating a captioning job.
#[derive(Debug, Clone)]
pub struct JobSpec {
    pub provider_name: String,
    pub media_url: String,
    pub language: String,
    pub provider_params: HashMap<String, String>,
}

/// Submits new jobs to their chosen provider and owns the local job
/// bookkeeping (cancel, lookup, explicit status refresh).
pub struct Dispatcher {
    registry: Arc<ProviderRegistry>,
    repository: Arc<dyn JobRepository>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ProviderRegistry>, repository: Arc<dyn JobRepository>) -> Self {
        Self {
            registry,
            repository,
        }
    }

    /// Create and dispatch a job. The provider lookup happens before any
    /// persistence or vendor call; a dispatch failure persists the job as
    /// failed and surfaces the error to the caller. Dispatch is one-shot,
    /// there is no automatic retry.
    pub async fn create_job(&self, spec: JobSpec) -> Result<Job, DispatchError> {
        let provider = self
            .registry
            .get(&spec.provider_name)
            .ok_or_else(|| DispatchError::UnknownProvider(spec.provider_name.clone()))?;

        let mut job = Job::new(
            spec.media_url,
            spec.language,
            spec.provider_name,
            spec.provider_params,
        );
        self.repository.save(&job).await?;

        tracing::info!(
            job_id = %job.id,
            provider = %job.provider_name,
            media_url = %job.media_url,
            "Dispatching job"
        );

        match provider.dispatch_job(&mut job).await {
            Ok(()) => {
                job.status = JobStatus::Dispatched;
                job.updated_at = chrono::Utc::now();
                self.repository.save(&job).await?;
                Ok(job)
            }
            Err(e) => {
                tracing::error!(job_id = %job.id, error = %e, "Dispatch failed");
                job.status = JobStatus::Failed;
                job.details = Some(e.to_string());
                job.updated_at = chrono::Utc::now();
                self.repository.save(&job).await?;
                Err(DispatchError::VendorCallFailed(e))
            }
        }
    }

    /// Local bookkeeping only; no vendor-side cancellation is implied.
    pub async fn cancel_job(&self, id: JobId) -> Result<Job, DispatchError> {
        let mut job = self.get_job(id).await?;
        if job.status.is_terminal() {
            return Err(DispatchError::InvalidTransition {
                from: job.status,
                to: JobStatus::Canceled,
            });
        }
        job.status = JobStatus::Canceled;
        job.updated_at = chrono::Utc::now();
        self.repository.save(&job).await?;
        tracing::info!(job_id = %id, "Job canceled");
        Ok(job)
    }

    /// Persisted state only; callers that need freshness go through
    /// [`refresh_job_status`](Self::refresh_job_status).
    pub async fn get_job(&self, id: JobId) -> Result<Job, DispatchError> {
        self.repository
            .get(id)
            .await?
            .ok_or(DispatchError::NotFound(id))
    }

    /// Live status poll: ask the owning provider for its authoritative view
    /// and fold it into the persisted job. Terminal jobs are returned as-is
    /// without a vendor call; nothing may transition them further.
    pub async fn refresh_job_status(&self, id: JobId) -> Result<Job, DispatchError> {
        let mut job = self.get_job(id).await?;
        if job.status.is_terminal() {
            return Ok(job);
        }
        let provider = self
            .registry
            .get(&job.provider_name)
            .ok_or_else(|| DispatchError::UnknownProvider(job.provider_name.clone()))?;
        let provider_id = job
            .provider_id()
            .ok_or(DispatchError::MissingProviderId(id))?
            .to_string();

        let snapshot = provider
            .provider_job(&provider_id)
            .await
            .map_err(DispatchError::VendorCallFailed)?;

        job.apply_snapshot(&snapshot);
        self.repository.save(&job).await?;
        Ok(job)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
    #[error("job not found: {0}")]
    NotFound(JobId),
    #[error("vendor call failed: {0}")]
    VendorCallFailed(#[source] ProviderError),
    #[error("invalid transition: {from} -> {to}")]
    InvalidTransition { from: JobStatus, to: JobStatus },
    #[error("job {0} has no provider-assigned identifier")]
    MissingProviderId(JobId),
    #[error("persistence: {0}")]
    Persistence(#[from] RepositoryError),
}

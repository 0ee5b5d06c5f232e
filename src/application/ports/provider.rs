use async_trait::async_trait;

use crate::domain::{Job, ProviderJob};

/// Capability contract every vendor integration implements. The dispatcher
/// and reconciler only ever talk to vendors through these four calls; a
/// vendor's quirks (status vocabulary, required parameters, auth) stay inside
/// its own implementation.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Stable lowercase vendor identifier, used as the registry key and as
    /// `Job::provider_name`.
    fn name(&self) -> &str;

    /// Submit the job to the vendor. On success the vendor-assigned
    /// identifiers needed for later status queries are recorded in
    /// `job.provider_params`. At most once per job: a second dispatch may
    /// create duplicate vendor-side work.
    async fn dispatch_job(&self, job: &mut Job) -> Result<(), ProviderError>;

    /// Live status query against the vendor. Blocks for the vendor round
    /// trip; the returned snapshot carries the canonical status, already
    /// mapped from the vendor's vocabulary.
    async fn provider_job(&self, id: &str) -> Result<ProviderJob, ProviderError>;

    /// Retrieve the finished caption artifact. `format` is vendor-specific
    /// and may be ignored by vendors with a single output encoding.
    async fn download(&self, id: &str, format: &str) -> Result<Vec<u8>, ProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("vendor request failed: {0}")]
    RequestFailed(String),
    #[error("vendor rejected dispatch: {0}")]
    DispatchRejected(String),
    #[error("unexpected vendor response: {0}")]
    InvalidResponse(String),
}

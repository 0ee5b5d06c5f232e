mod artifact_key;
mod callback;
mod job;
mod job_status;
mod provider_job;

pub use artifact_key::ArtifactKey;
pub use callback::CallbackNotification;
pub use job::{Job, JobId};
pub use job_status::JobStatus;
pub use provider_job::ProviderJob;

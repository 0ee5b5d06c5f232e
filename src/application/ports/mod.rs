mod artifact_store;
mod job_repository;
mod provider;
mod repository_error;

pub use artifact_store::{ArtifactStore, ArtifactStoreError};
pub use job_repository::JobRepository;
pub use provider::{Provider, ProviderError};
pub use repository_error::RepositoryError;

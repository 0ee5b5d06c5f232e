use async_trait::async_trait;

use crate::domain::{Job, JobId};

use super::RepositoryError;

/// Persistence port for job records. Point lookups and upserts keyed by job
/// id; the backing store is expected to provide at least last-writer-wins
/// semantics for concurrent updates.
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn save(&self, job: &Job) -> Result<(), RepositoryError>;

    async fn get(&self, id: JobId) -> Result<Option<Job>, RepositoryError>;

    async fn delete(&self, id: JobId) -> Result<(), RepositoryError>;
}

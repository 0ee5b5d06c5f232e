use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::Instrument;

use crate::application::ports::{JobRepository, Provider, ProviderError, RepositoryError};
use crate::domain::CallbackNotification;

use super::ProviderRegistry;

/// Retry behavior for failed notification processing.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_millis(100),
        }
    }
}

/// A notification that exhausted its retries (or failed permanently),
/// parked for manual reconciliation.
#[derive(Debug)]
pub struct DeadLetter {
    pub notification: CallbackNotification,
    pub attempts: u32,
    pub last_error: String,
}

/// Sink for notifications the reconciler gave up on. Drained items can be
/// re-reconciled via the dispatcher's live status-refresh path.
#[derive(Default)]
pub struct DeadLetterSink {
    items: Mutex<VecDeque<DeadLetter>>,
}

impl DeadLetterSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, letter: DeadLetter) {
        self.items.lock().expect("dead letter lock poisoned").push_back(letter);
    }

    pub fn drain(&self) -> Vec<DeadLetter> {
        self.items
            .lock()
            .expect("dead letter lock poisoned")
            .drain(..)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.lock().expect("dead letter lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Folds vendor callbacks into persisted job state.
///
/// Exactly one reconciler task owns the receiving half of the intake queue,
/// so all notification-driven job mutations are serialized; producers never
/// wait on it (the channel is unbounded).
pub struct CallbackReconciler {
    receiver: mpsc::UnboundedReceiver<CallbackNotification>,
    registry: Arc<ProviderRegistry>,
    repository: Arc<dyn JobRepository>,
    dead_letters: Arc<DeadLetterSink>,
    policy: RetryPolicy,
}

impl CallbackReconciler {
    pub fn new(
        receiver: mpsc::UnboundedReceiver<CallbackNotification>,
        registry: Arc<ProviderRegistry>,
        repository: Arc<dyn JobRepository>,
        dead_letters: Arc<DeadLetterSink>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            receiver,
            registry,
            repository,
            dead_letters,
            policy,
        }
    }

    /// Drain the intake queue until it is closed. Notifications are handled
    /// strictly one at a time, in arrival order; a failing notification is
    /// retried with backoff and then dead-lettered, never allowed to stall
    /// the intake of subsequent ones.
    pub async fn run(mut self) {
        tracing::info!("Callback reconciler started");
        while let Some(notification) = self.receiver.recv().await {
            let span = tracing::info_span!(
                "callback",
                job_id = %notification.job_id,
                provider = %notification.provider_name,
            );
            self.reconcile_with_retry(notification).instrument(span).await;
        }
        tracing::info!("Callback reconciler stopped: intake queue closed");
    }

    async fn reconcile_with_retry(&self, notification: CallbackNotification) {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.reconcile(&notification).await {
                Ok(()) => return,
                Err(e) if e.is_transient() && attempts < self.policy.max_attempts => {
                    tracing::warn!(
                        error = %e,
                        attempt = attempts,
                        "Callback reconciliation failed, retrying"
                    );
                    tokio::time::sleep(self.policy.base_backoff * attempts).await;
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        attempts,
                        payload = %notification.payload,
                        "Callback failed, dead-lettering"
                    );
                    self.dead_letters.push(DeadLetter {
                        notification,
                        attempts,
                        last_error: e.to_string(),
                    });
                    return;
                }
            }
        }
    }

    /// Per-notification algorithm: load the job, resolve its provider
    /// (falling back to the provider named by the notification), ask the
    /// provider for authoritative status, persist the updated job. Any
    /// failure leaves the persisted job untouched.
    async fn reconcile(&self, notification: &CallbackNotification) -> Result<(), ReconcileError> {
        let mut job = self
            .repository
            .get(notification.job_id)
            .await?
            .ok_or(ReconcileError::UnknownJob(notification.job_id))?;

        // A terminal job accepts no further transitions; a late callback
        // for it is acknowledged and dropped.
        if job.status.is_terminal() {
            tracing::info!(status = %job.status, "Dropping callback for terminal job");
            return Ok(());
        }

        let provider_name = if job.provider_name.is_empty() {
            notification.provider_name.clone()
        } else {
            job.provider_name.clone()
        };
        let provider = self
            .registry
            .get(&provider_name)
            .ok_or(ReconcileError::UnknownProvider(provider_name))?;

        let provider_id = job
            .provider_id()
            .ok_or(ReconcileError::MissingProviderId(notification.job_id))?
            .to_string();
        let snapshot = provider.provider_job(&provider_id).await?;

        job.apply_snapshot(&snapshot);
        self.repository.save(&job).await?;

        tracing::info!(status = %job.status, "Job reconciled");
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("no job for notification: {0}")]
    UnknownJob(crate::domain::JobId),
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
    #[error("job {0} has no provider-assigned identifier")]
    MissingProviderId(crate::domain::JobId),
    #[error("vendor call failed: {0}")]
    VendorCallFailed(#[from] ProviderError),
    #[error("persistence: {0}")]
    Persistence(#[from] RepositoryError),
}

impl ReconcileError {
    /// Transient failures are worth retrying; a job or provider that does
    /// not exist will not appear by waiting.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ReconcileError::VendorCallFailed(_) | ReconcileError::Persistence(_)
        )
    }
}

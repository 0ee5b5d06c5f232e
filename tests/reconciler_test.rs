use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use captiond::application::ports::JobRepository;
use captiond::application::services::{
    CallbackReconciler, DeadLetterSink, Dispatcher, JobSpec, ProviderRegistry, RetryPolicy,
};
use captiond::domain::{CallbackNotification, Job, JobId, JobStatus};
use captiond::infrastructure::persistence::MemoryJobRepository;
use captiond::infrastructure::providers::MockProvider;

struct Harness {
    provider: Arc<MockProvider>,
    repository: Arc<MemoryJobRepository>,
    registry: Arc<ProviderRegistry>,
    dead_letters: Arc<DeadLetterSink>,
    sender: mpsc::UnboundedSender<CallbackNotification>,
    handle: tokio::task::JoinHandle<()>,
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_backoff: Duration::from_millis(1),
    }
}

fn start_reconciler(policy: RetryPolicy) -> Harness {
    let provider = Arc::new(MockProvider::new("vendorx"));
    let mut registry = ProviderRegistry::new();
    registry.register(provider.clone());
    let registry = Arc::new(registry);
    let repository = Arc::new(MemoryJobRepository::new());
    let dead_letters = Arc::new(DeadLetterSink::new());

    let (sender, receiver) = mpsc::unbounded_channel();
    let reconciler = CallbackReconciler::new(
        receiver,
        Arc::clone(&registry),
        repository.clone(),
        Arc::clone(&dead_letters),
        policy,
    );
    let handle = tokio::spawn(reconciler.run());

    Harness {
        provider,
        repository,
        registry,
        dead_letters,
        sender,
        handle,
    }
}

async fn dispatched_job(harness: &Harness) -> Job {
    let dispatcher = Dispatcher::new(
        Arc::clone(&harness.registry),
        harness.repository.clone(),
    );
    dispatcher
        .create_job(JobSpec {
            provider_name: "vendorx".to_string(),
            media_url: "http://ex/a.mp4".to_string(),
            language: "en".to_string(),
            provider_params: HashMap::new(),
        })
        .await
        .unwrap()
}

fn notification_for(job_id: JobId) -> CallbackNotification {
    CallbackNotification {
        job_id,
        provider_name: "vendorx".to_string(),
        payload: serde_json::json!({ "job_id": job_id.to_string() }),
    }
}

#[tokio::test]
async fn given_delivered_vendor_status_when_callback_processed_then_job_becomes_delivered() {
    let harness = start_reconciler(fast_retry());
    let job = dispatched_job(&harness).await;
    harness.provider.set_status(JobStatus::Delivered);

    harness.sender.send(notification_for(job.id)).unwrap();
    drop(harness.sender);
    harness.handle.await.unwrap();

    let persisted = harness.repository.get(job.id).await.unwrap().unwrap();
    assert_eq!(persisted.status, JobStatus::Delivered);
    assert_eq!(persisted.provider_params.get("SubVersion").unwrap(), "1");
    assert!(harness.dead_letters.is_empty());
}

#[tokio::test]
async fn given_notifications_for_distinct_jobs_then_each_job_is_updated_independently() {
    let harness = start_reconciler(fast_retry());
    let first = dispatched_job(&harness).await;
    let second = dispatched_job(&harness).await;
    let third = dispatched_job(&harness).await;
    harness.provider.set_status(JobStatus::InReview);

    // Interleaved arrival order across unrelated jobs.
    harness.sender.send(notification_for(second.id)).unwrap();
    harness.sender.send(notification_for(first.id)).unwrap();
    harness.sender.send(notification_for(third.id)).unwrap();
    drop(harness.sender);
    harness.handle.await.unwrap();

    for id in [first.id, second.id, third.id] {
        let persisted = harness.repository.get(id).await.unwrap().unwrap();
        assert_eq!(persisted.status, JobStatus::InReview);
    }
    assert_eq!(harness.provider.status_calls(), 3);
}

#[tokio::test]
async fn given_vendor_failure_when_retries_exhaust_then_job_unchanged_and_callback_dead_lettered()
{
    let harness = start_reconciler(fast_retry());
    let job = dispatched_job(&harness).await;
    harness.provider.set_fail_status(true);

    harness.sender.send(notification_for(job.id)).unwrap();
    drop(harness.sender);
    harness.handle.await.unwrap();

    let persisted = harness.repository.get(job.id).await.unwrap().unwrap();
    assert_eq!(persisted.status, JobStatus::Dispatched);

    let letters = harness.dead_letters.drain();
    assert_eq!(letters.len(), 1);
    assert_eq!(letters[0].attempts, 3);
    assert_eq!(letters[0].notification.job_id, job.id);
}

#[tokio::test]
async fn given_transient_vendor_failure_when_it_recovers_mid_retry_then_callback_succeeds() {
    let harness = start_reconciler(RetryPolicy {
        max_attempts: 5,
        base_backoff: Duration::from_millis(20),
    });
    let job = dispatched_job(&harness).await;
    harness.provider.set_status(JobStatus::Delivered);
    harness.provider.set_fail_status(true);

    harness.sender.send(notification_for(job.id)).unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    harness.provider.set_fail_status(false);

    drop(harness.sender);
    harness.handle.await.unwrap();

    let persisted = harness.repository.get(job.id).await.unwrap().unwrap();
    assert_eq!(persisted.status, JobStatus::Delivered);
    assert!(harness.dead_letters.is_empty());
}

#[tokio::test]
async fn given_canceled_job_when_callback_arrives_then_it_stays_canceled() {
    let harness = start_reconciler(fast_retry());
    let job = dispatched_job(&harness).await;
    let dispatcher = Dispatcher::new(
        Arc::clone(&harness.registry),
        harness.repository.clone(),
    );
    dispatcher.cancel_job(job.id).await.unwrap();
    harness.provider.set_status(JobStatus::InReview);

    harness.sender.send(notification_for(job.id)).unwrap();
    drop(harness.sender);
    harness.handle.await.unwrap();

    // The late callback is acknowledged and dropped without a vendor call.
    let persisted = harness.repository.get(job.id).await.unwrap().unwrap();
    assert_eq!(persisted.status, JobStatus::Canceled);
    assert_eq!(harness.provider.status_calls(), 0);
    assert!(harness.dead_letters.is_empty());
}

#[tokio::test]
async fn given_job_without_vendor_id_then_callback_is_dead_lettered_without_retries() {
    let harness = start_reconciler(fast_retry());
    let mut job = Job::new(
        "http://ex/a.mp4".to_string(),
        "en".to_string(),
        "vendorx".to_string(),
        HashMap::new(),
    );
    job.status = JobStatus::Dispatched;
    harness.repository.save(&job).await.unwrap();

    harness.sender.send(notification_for(job.id)).unwrap();
    drop(harness.sender);
    harness.handle.await.unwrap();

    let letters = harness.dead_letters.drain();
    assert_eq!(letters.len(), 1);
    assert_eq!(letters[0].attempts, 1);
    assert_eq!(harness.provider.status_calls(), 0);
}

#[tokio::test]
async fn given_callback_for_unknown_job_then_it_is_dead_lettered_without_retries() {
    let harness = start_reconciler(fast_retry());

    harness.sender.send(notification_for(JobId::new())).unwrap();
    drop(harness.sender);
    harness.handle.await.unwrap();

    let letters = harness.dead_letters.drain();
    assert_eq!(letters.len(), 1);
    // Not transient: no point retrying a job that does not exist.
    assert_eq!(letters[0].attempts, 1);
}

#[tokio::test]
async fn given_same_notification_twice_with_unchanged_vendor_status_then_state_is_identical() {
    let harness = start_reconciler(fast_retry());
    let job = dispatched_job(&harness).await;
    harness.provider.set_status(JobStatus::Delivered);

    harness.sender.send(notification_for(job.id)).unwrap();
    harness.sender.send(notification_for(job.id)).unwrap();
    drop(harness.sender);
    harness.handle.await.unwrap();

    let persisted = harness.repository.get(job.id).await.unwrap().unwrap();
    assert_eq!(persisted.status, JobStatus::Delivered);
    assert_eq!(persisted.provider_params.get("SubVersion").unwrap(), "1");
    assert_eq!(harness.provider.status_calls(), 2);
    assert!(harness.dead_letters.is_empty());
}

#[tokio::test]
async fn given_failing_callback_then_subsequent_notifications_are_still_processed() {
    let harness = start_reconciler(fast_retry());
    let healthy = dispatched_job(&harness).await;
    harness.provider.set_status(JobStatus::Delivered);

    // First notification targets a job that does not exist and fails; the
    // healthy one behind it must still go through.
    harness.sender.send(notification_for(JobId::new())).unwrap();
    harness.sender.send(notification_for(healthy.id)).unwrap();
    drop(harness.sender);
    harness.handle.await.unwrap();

    let persisted = harness.repository.get(healthy.id).await.unwrap().unwrap();
    assert_eq!(persisted.status, JobStatus::Delivered);
    assert_eq!(harness.dead_letters.len(), 1);
}

#[tokio::test]
async fn given_closed_intake_queue_then_reconciler_exits_cleanly() {
    let harness = start_reconciler(fast_retry());
    drop(harness.sender);

    tokio::time::timeout(Duration::from_secs(1), harness.handle)
        .await
        .expect("reconciler did not stop after queue close")
        .unwrap();
}

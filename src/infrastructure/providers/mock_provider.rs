use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::ports::{Provider, ProviderError};
use crate::domain::{Job, JobStatus, ProviderJob};

/// In-process provider with scriptable behavior, for tests and scaffold
/// wiring. Dispatch assigns `ProviderID = "mock-<job id>"`; status queries
/// report whatever [`set_status`](Self::set_status) was last given.
pub struct MockProvider {
    name: String,
    caption: Vec<u8>,
    reported_status: Mutex<JobStatus>,
    fail_dispatch: AtomicBool,
    fail_status: AtomicBool,
    dispatch_calls: AtomicU32,
    status_calls: AtomicU32,
    download_calls: AtomicU32,
}

impl MockProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            caption: b"WEBVTT\n\n00:00.000 --> 00:02.000\nmock caption\n".to_vec(),
            reported_status: Mutex::new(JobStatus::InReview),
            fail_dispatch: AtomicBool::new(false),
            fail_status: AtomicBool::new(false),
            dispatch_calls: AtomicU32::new(0),
            status_calls: AtomicU32::new(0),
            download_calls: AtomicU32::new(0),
        }
    }

    pub fn set_status(&self, status: JobStatus) {
        *self.reported_status.lock().unwrap() = status;
    }

    pub fn set_fail_dispatch(&self, fail: bool) {
        self.fail_dispatch.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_status(&self, fail: bool) {
        self.fail_status.store(fail, Ordering::SeqCst);
    }

    pub fn dispatch_calls(&self) -> u32 {
        self.dispatch_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> u32 {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn download_calls(&self) -> u32 {
        self.download_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn dispatch_job(&self, job: &mut Job) -> Result<(), ProviderError> {
        self.dispatch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_dispatch.load(Ordering::SeqCst) {
            return Err(ProviderError::DispatchRejected(
                "mock dispatch failure".to_string(),
            ));
        }
        job.provider_params
            .insert("ProviderID".to_string(), format!("mock-{}", job.id));
        job.provider_params
            .insert("SubVersion".to_string(), "1".to_string());
        Ok(())
    }

    async fn provider_job(&self, id: &str) -> Result<ProviderJob, ProviderError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_status.load(Ordering::SeqCst) {
            return Err(ProviderError::RequestFailed(
                "mock status failure".to_string(),
            ));
        }
        let status = *self.reported_status.lock().unwrap();
        Ok(ProviderJob {
            id: id.to_string(),
            status,
            details: "Version 1".to_string(),
            params: HashMap::from([("SubVersion".to_string(), "1".to_string())]),
        })
    }

    async fn download(&self, id: &str, _format: &str) -> Result<Vec<u8>, ProviderError> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        if id.is_empty() {
            return Err(ProviderError::RequestFailed(
                "empty provider id".to_string(),
            ));
        }
        Ok(self.caption.clone())
    }
}

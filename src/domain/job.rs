use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{JobStatus, ProviderJob};

/// A locally tracked request to produce captions for a media asset via a
/// specific provider.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub media_url: String,
    pub language: String,
    pub provider_name: String,
    pub provider_params: HashMap<String, String>,
    pub status: JobStatus,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(
        media_url: String,
        language: String,
        provider_name: String,
        provider_params: HashMap<String, String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            media_url,
            language,
            provider_name,
            provider_params,
            status: JobStatus::Created,
            details: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Fold a provider's live snapshot into this job. Used by both the
    /// callback reconciler and the explicit status-refresh path.
    pub fn apply_snapshot(&mut self, snapshot: &ProviderJob) {
        self.status = snapshot.status;
        if !snapshot.details.is_empty() {
            self.details = Some(snapshot.details.clone());
        }
        for (k, v) in &snapshot.params {
            self.provider_params.insert(k.clone(), v.clone());
        }
        self.updated_at = Utc::now();
    }

    /// Vendor-assigned identifier recorded at dispatch time, if any.
    pub fn provider_id(&self) -> Option<&str> {
        self.provider_params.get("ProviderID").map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::Job;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Serialize)]
pub struct JobResponse {
    pub id: String,
    pub media_url: String,
    pub language: String,
    pub provider: String,
    pub provider_params: HashMap<String, String>,
    pub status: String,
    pub details: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Job> for JobResponse {
    fn from(job: Job) -> Self {
        Self {
            id: job.id.to_string(),
            media_url: job.media_url,
            language: job.language,
            provider: job.provider_name,
            provider_params: job.provider_params,
            status: job.status.as_str().to_string(),
            details: job.details,
            created_at: job.created_at.to_rfc3339(),
            updated_at: job.updated_at.to_rfc3339(),
        }
    }
}

use std::collections::HashMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::application::services::{DispatchError, JobSpec};
use crate::presentation::state::AppState;

use super::responses::{ErrorResponse, JobResponse};

#[derive(Deserialize)]
pub struct CreateJobRequest {
    pub provider: String,
    pub media_url: String,
    pub language: String,
    #[serde(default)]
    pub provider_params: HashMap<String, String>,
}

#[tracing::instrument(skip(state, request), fields(provider = %request.provider))]
pub async fn create_job_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateJobRequest>,
) -> impl IntoResponse {
    let spec = JobSpec {
        provider_name: request.provider,
        media_url: request.media_url,
        language: request.language,
        provider_params: request.provider_params,
    };

    match state.dispatcher.create_job(spec).await {
        Ok(job) => (StatusCode::CREATED, Json(JobResponse::from(job))).into_response(),
        Err(DispatchError::UnknownProvider(name)) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(format!("Unknown provider: {}", name))),
        )
            .into_response(),
        Err(e @ DispatchError::VendorCallFailed(_)) => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse::new(e.to_string())),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to create job");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response()
        }
    }
}

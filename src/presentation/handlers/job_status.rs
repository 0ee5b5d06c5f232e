use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use crate::application::services::DispatchError;
use crate::domain::JobId;
use crate::presentation::state::AppState;

use super::responses::{ErrorResponse, JobResponse};

/// Persisted job state; never calls the vendor.
#[tracing::instrument(skip(state))]
pub async fn get_job_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    let id = match parse_job_id(&job_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.dispatcher.get_job(id).await {
        Ok(job) => (StatusCode::OK, Json(JobResponse::from(job))).into_response(),
        Err(e) => dispatch_error_response(e),
    }
}

/// Live status poll: re-queries the owning provider and persists the result.
#[tracing::instrument(skip(state))]
pub async fn refresh_job_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    let id = match parse_job_id(&job_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.dispatcher.refresh_job_status(id).await {
        Ok(job) => (StatusCode::OK, Json(JobResponse::from(job))).into_response(),
        Err(e) => dispatch_error_response(e),
    }
}

pub(super) fn parse_job_id(raw: &str) -> Result<JobId, Response> {
    Uuid::parse_str(raw).map(JobId::from_uuid).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(format!("Invalid job ID: {}", raw))),
        )
            .into_response()
    })
}

pub(super) fn dispatch_error_response(error: DispatchError) -> Response {
    match error {
        DispatchError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("Job not found: {}", id))),
        )
            .into_response(),
        DispatchError::UnknownProvider(name) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(format!("Unknown provider: {}", name))),
        )
            .into_response(),
        e @ DispatchError::VendorCallFailed(_) => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse::new(e.to_string())),
        )
            .into_response(),
        e @ DispatchError::InvalidTransition { .. } | e @ DispatchError::MissingProviderId(_) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::new(e.to_string())),
        )
            .into_response(),
        e => {
            tracing::error!(error = %e, "Job operation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response()
        }
    }
}

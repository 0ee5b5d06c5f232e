use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::presentation::state::AppState;

use super::job_status::{dispatch_error_response, parse_job_id};
use super::responses::JobResponse;

/// Local bookkeeping only: marks the job canceled without a vendor call.
#[tracing::instrument(skip(state))]
pub async fn cancel_job_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    let id = match parse_job_id(&job_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.dispatcher.cancel_job(id).await {
        Ok(job) => (StatusCode::OK, Json(JobResponse::from(job))).into_response(),
        Err(e) => dispatch_error_response(e),
    }
}

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use crate::application::services::RetrievalError;
use crate::presentation::state::AppState;

use super::job_status::parse_job_id;
use super::responses::ErrorResponse;

#[tracing::instrument(skip(state))]
pub async fn download_caption_handler(
    State(state): State<AppState>,
    Path((job_id, format)): Path<(String, String)>,
) -> impl IntoResponse {
    let id = match parse_job_id(&job_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.retrieval.download_caption(id, &format).await {
        Ok(data) => {
            let content_type = match format.as_str() {
                "vtt" => "text/vtt",
                "srt" => "application/x-subrip",
                _ => "application/octet-stream",
            };
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, content_type)],
                data,
            )
                .into_response()
        }
        Err(e @ RetrievalError::NotReady { .. }) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::new(e.to_string())),
        )
            .into_response(),
        Err(RetrievalError::NotFound(id)) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("Job not found: {}", id))),
        )
            .into_response(),
        Err(e @ RetrievalError::VendorCallFailed(_)) => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse::new(e.to_string())),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Caption download failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response()
        }
    }
}

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use crate::domain::{CallbackNotification, JobId};
use crate::presentation::state::AppState;

use super::responses::ErrorResponse;

/// Vendor push notification intake. The only vendor-specific parsing done
/// here is extracting the job id; everything else stays opaque until the
/// reconciler asks the provider for authoritative status. Enqueuing never
/// waits on the reconciler.
#[tracing::instrument(skip(state, payload))]
pub async fn callback_handler(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Json(payload): Json<serde_json::Value>,
) -> impl IntoResponse {
    if state.registry.get(&provider).is_none() {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("Unknown provider: {}", provider))),
        )
            .into_response();
    }

    let job_id = payload
        .get("job_id")
        .and_then(|v| v.as_str())
        .and_then(|s| Uuid::parse_str(s).ok())
        .map(JobId::from_uuid);

    let job_id = match job_id {
        Some(id) => id,
        None => {
            tracing::warn!(provider = %provider, payload = %payload, "Malformed callback");
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse::new("Callback payload has no valid job_id")),
            )
                .into_response();
        }
    };

    let notification = CallbackNotification {
        job_id,
        provider_name: provider,
        payload,
    };

    if state.callback_sender.send(notification).is_err() {
        // Receiver gone: the service is shutting down.
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new("Callback intake is closed")),
        )
            .into_response();
    }

    StatusCode::ACCEPTED.into_response()
}

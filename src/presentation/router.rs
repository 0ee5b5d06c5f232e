use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    callback_handler, cancel_job_handler, create_job_handler, download_caption_handler,
    get_job_handler, health_handler, refresh_job_handler,
};
use crate::presentation::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/captions", post(create_job_handler))
        .route("/jobs/{job_id}", get(get_job_handler))
        .route("/jobs/{job_id}/status", get(refresh_job_handler))
        .route("/jobs/{job_id}/cancel", post(cancel_job_handler))
        .route(
            "/jobs/{job_id}/download/{caption_format}",
            get(download_caption_handler),
        )
        .route("/callbacks/{provider}", post(callback_handler))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}

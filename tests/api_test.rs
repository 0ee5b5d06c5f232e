use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use captiond::application::services::{
    CallbackReconciler, CaptionRetrieval, DeadLetterSink, Dispatcher, ProviderRegistry,
    RetryPolicy,
};
use captiond::domain::JobStatus;
use captiond::infrastructure::persistence::MemoryJobRepository;
use captiond::infrastructure::providers::MockProvider;
use captiond::infrastructure::storage::MemoryArtifactStore;
use captiond::presentation::{create_router, AppState};

fn test_app() -> (axum::Router, Arc<MockProvider>) {
    let provider = Arc::new(MockProvider::new("vendorx"));
    let mut registry = ProviderRegistry::new();
    registry.register(provider.clone());
    let registry = Arc::new(registry);

    let repository = Arc::new(MemoryJobRepository::new());
    let dispatcher = Arc::new(Dispatcher::new(
        Arc::clone(&registry),
        repository.clone(),
    ));
    let retrieval = Arc::new(CaptionRetrieval::new(
        Arc::clone(&registry),
        repository.clone(),
        Arc::new(MemoryArtifactStore::new()),
    ));

    let (callback_sender, callback_receiver) = tokio::sync::mpsc::unbounded_channel();
    let reconciler = CallbackReconciler::new(
        callback_receiver,
        Arc::clone(&registry),
        repository,
        Arc::new(DeadLetterSink::new()),
        RetryPolicy {
            max_attempts: 3,
            base_backoff: Duration::from_millis(1),
        },
    );
    tokio::spawn(reconciler.run());

    let state = AppState {
        dispatcher,
        retrieval,
        registry,
        callback_sender,
    };

    (create_router(state), provider)
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_job(app: &axum::Router) -> serde_json::Value {
    let request = Request::builder()
        .method("POST")
        .uri("/captions")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({
                "provider": "vendorx",
                "media_url": "http://ex/a.mp4",
                "language": "en",
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await
}

async fn get_job(app: &axum::Router, id: &str) -> serde_json::Value {
    let request = Request::builder()
        .uri(format!("/jobs/{}", id))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    json_body(response).await
}

/// The reconciler runs on its own task; poll until the callback lands.
async fn wait_for_status(app: &axum::Router, id: &str, expected: &str) -> serde_json::Value {
    for _ in 0..100 {
        let job = get_job(app, id).await;
        if job["status"] == expected {
            return job;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {} never reached status {}", id, expected);
}

#[tokio::test]
async fn given_running_service_when_health_checked_then_healthy() {
    let (app, _provider) = test_app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn given_valid_request_when_creating_job_then_dispatched_job_is_returned() {
    let (app, _provider) = test_app();

    let job = create_job(&app).await;

    assert_eq!(job["status"], "dispatched");
    assert_eq!(job["provider"], "vendorx");
    assert!(job["provider_params"]["ProviderID"]
        .as_str()
        .unwrap()
        .starts_with("mock-"));
}

#[tokio::test]
async fn given_unknown_provider_when_creating_job_then_bad_request() {
    let (app, provider) = test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/captions")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({
                "provider": "unknown",
                "media_url": "http://ex/a.mp4",
                "language": "en",
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(provider.dispatch_calls(), 0);
}

#[tokio::test]
async fn given_dispatched_job_when_vendor_completes_then_callback_drives_it_to_delivered() {
    let (app, provider) = test_app();
    let job = create_job(&app).await;
    let id = job["id"].as_str().unwrap().to_string();

    provider.set_status(JobStatus::Delivered);
    let request = Request::builder()
        .method("POST")
        .uri("/callbacks/vendorx")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({ "job_id": id, "event": "subtitles_complete" }).to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let job = wait_for_status(&app, &id, "delivered").await;
    assert_eq!(job["details"], "Version 1");

    // Caption is now downloadable.
    let request = Request::builder()
        .uri(format!("/jobs/{}/download/vtt", id))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/vtt"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(!bytes.is_empty());
}

#[tokio::test]
async fn given_job_still_in_review_when_downloading_then_conflict() {
    let (app, _provider) = test_app();
    let job = create_job(&app).await;
    let id = job["id"].as_str().unwrap();

    let request = Request::builder()
        .uri(format!("/jobs/{}/download/vtt", id))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn given_dispatched_job_when_canceled_twice_then_second_cancel_conflicts() {
    let (app, _provider) = test_app();
    let job = create_job(&app).await;
    let id = job["id"].as_str().unwrap();

    let cancel = |app: axum::Router| {
        let uri = format!("/jobs/{}/cancel", id);
        async move {
            app.oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
        }
    };

    let response = cancel(app.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "canceled");

    let response = cancel(app).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn given_callback_without_job_id_then_unprocessable_entity() {
    let (app, _provider) = test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/callbacks/vendorx")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::json!({ "event": "ping" }).to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn given_callback_for_unregistered_provider_then_not_found() {
    let (app, _provider) = test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/callbacks/nobody")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({ "job_id": "00000000-0000-0000-0000-000000000000" }).to_string(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn given_live_status_endpoint_when_polled_then_provider_snapshot_is_applied() {
    let (app, provider) = test_app();
    let job = create_job(&app).await;
    let id = job["id"].as_str().unwrap();

    provider.set_status(JobStatus::InReview);
    let request = Request::builder()
        .uri(format!("/jobs/{}/status", id))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "in_review");
    assert_eq!(provider.status_calls(), 1);
}

#[tokio::test]
async fn given_malformed_job_id_when_fetching_then_bad_request() {
    let (app, _provider) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/jobs/not-a-uuid")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use signals_api::config::ServerConfig;
use signals_api::router::build_app_router;
use signals_api::state::AppState;
use signals_core::job::Job;
use signals_core::stage::Stage;
use signals_core::types::JobId;
use signals_events::OutboxProvider;
use signals_pipeline::Collaborators;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        public_base_url: "http://signals.test".to_string(),
    }
}

/// A fully wired application backed by the in-memory outbox.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub outbox: Arc<OutboxProvider>,
}

impl TestApp {
    /// Cheap clone of the router for a single `oneshot` call.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    pub fn sent(&self) -> usize {
        self.outbox.sent_count()
    }
}

/// Build the application with the same router and middleware as `main.rs`.
///
/// Research collaborators are all unavailable, so background runs finish
/// with an inconclusive verdict without touching the network.
pub fn build_test_app() -> TestApp {
    build_test_app_with(Collaborators::unavailable())
}

/// Same as [`build_test_app`] with the given research collaborators.
pub fn build_test_app_with(collaborators: Collaborators) -> TestApp {
    let config = test_config();
    let outbox = Arc::new(OutboxProvider::new());
    let state = AppState::build(config.clone(), outbox.clone(), collaborators);
    state.spawn_history();

    TestApp {
        router: build_app_router(state.clone(), &config),
        state,
        outbox,
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body).await
}

pub async fn patch_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::PATCH, uri, body).await
}

async fn send_json(app: Router, method: Method, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a job through the API and return its id.
pub async fn signup(app: &TestApp, recipient: &str) -> String {
    let response = post_json(
        app.app(),
        "/api/signup",
        serde_json::json!({ "recipient": recipient }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["jobId"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Poll the registry until the job reaches `stage` or five seconds pass.
pub async fn wait_for_stage(app: &TestApp, job_id: JobId, stage: Stage) -> Job {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let job = app.state.registry.get(job_id).await.unwrap();
        if job.stage == stage || tokio::time::Instant::now() >= deadline {
            return job;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// Poll until `check` holds or five seconds pass.
pub async fn wait_until<F>(mut check: F)
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !check() && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use studioflow_api::config::ServerConfig;
use studioflow_api::router::build_app_router;
use studioflow_api::state::AppState;
use studioflow_db::MemoryStore;
use studioflow_engine::{Engine, EngineConfig};
use studioflow_events::testing::{RecordingEmailTransport, RecordingPushTransport};

pub const CUSTOMER_EMAIL: &str = "jane@example.com";
pub const DEVELOPER_EMAIL: &str = "dev@studio.example";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: None,
    }
}

pub struct TestApp {
    pub router: Router,
    pub engine: Arc<Engine>,
    pub email: Arc<RecordingEmailTransport>,
    pub push: Arc<RecordingPushTransport>,
}

impl TestApp {
    /// A fresh router sharing this app's engine.
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full application router over an in-memory store and recording
/// transports, with the same middleware stack production uses.
pub fn build_test_app() -> TestApp {
    with_push(RecordingPushTransport::new())
}

pub fn with_push(push: RecordingPushTransport) -> TestApp {
    let email = Arc::new(RecordingEmailTransport::new());
    let push = Arc::new(push);
    let engine = Arc::new(Engine::new(
        Arc::new(MemoryStore::new()),
        email.clone(),
        push.clone(),
        EngineConfig {
            developer_email: Some(DEVELOPER_EMAIL.to_string()),
            default_revisions_total: 5,
        },
    ));
    let config = test_config();
    let state = AppState {
        engine: Arc::clone(&engine),
        config: Arc::new(config.clone()),
    };
    TestApp {
        router: build_app_router(state, &config),
        engine,
        email,
        push,
    }
}

pub fn create_project_body(revisions_total: u32) -> Value {
    json!({
        "service_type": "website",
        "package_type": "professional",
        "customer": {
            "name": "Jane Doe",
            "email": CUSTOMER_EMAIL,
        },
        "revisions_total": revisions_total,
    })
}

/// Create a project through the API and return its id.
pub async fn create_project(app: Router, revisions_total: u32) -> String {
    let response = post_json(app, "/api/v1/projects", create_project_body(revisions_total)).await;
    assert_eq!(response.status(), 201);
    let json = body_json(response).await;
    json["data"]["id"].as_str().unwrap().to_string()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn patch_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(body)).await
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use ideaboard_api::config::ServerConfig;
use ideaboard_api::router::build_app_router;
use ideaboard_api::state::AppState;
use ideaboard_api::ws::WsManager;
use ideaboard_core::session::AdminSecret;
use ideaboard_store::repositories::CategoryRepo;
use ideaboard_store::MemoryStore;

/// Admin code configured for test apps.
pub const ADMIN_CODE: &str = "letmein";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// A router over a fresh in-memory store, plus the store for direct checks
/// and fault injection.
pub struct TestApp {
    pub app: Router,
    pub store: Arc<MemoryStore>,
}

/// Build the full application router with the production middleware stack
/// over a seeded in-memory store.
pub async fn build_test_app() -> TestApp {
    build_test_app_with_secret(AdminSecret::new(Some(ADMIN_CODE.to_string()))).await
}

/// Same as [`build_test_app`] with a caller-chosen admin code.
pub async fn build_test_app_with_secret(admin_secret: AdminSecret) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    CategoryRepo::ensure_seeded(store.as_ref()).await.unwrap();

    let config = test_config();
    let state = AppState::connect(
        store.clone(),
        config.clone(),
        Arc::new(WsManager::new()),
        admin_secret,
    )
    .await
    .unwrap();

    TestApp {
        app: build_app_router(state, &config),
        store,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn patch_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

pub async fn put_empty(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::PUT, uri, None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create an idea through the API and return its id.
pub async fn create_idea(app: &Router, title: &str) -> String {
    let response = post_json(
        app,
        "/api/v1/ideas",
        serde_json::json!({ "title": title, "submitter": "alice" }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

//! # Ingest API Tests
//!
//! Drives the axum router in-process. The pool is lazy and points at a port
//! nothing listens on, so any request that reaches the database fails with a
//! pool timeout while rejected bodies never touch it.
//!
//! ## Running the Tests
//!
//! ```bash
//! cargo test --test serve_test
//! ```

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use health_ingest::serve::{router, AppState};

fn unreachable_app() -> Router {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_millis(500))
        .connect_lazy("postgres://postgres@127.0.0.1:1/postgres")
        .unwrap();

    router(Arc::new(AppState {
        pool,
        statement_timeout_ms: 1_000,
    }))
}

fn post_metrics(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/health_metric")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn detail(body: &Value) -> &str {
    body["detail"].as_str().unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(unreachable_app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_missing_data_is_a_client_error() {
    let (status, body) = send(unreachable_app(), post_metrics(r#"{"metrics": []}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(detail(&body).starts_with("Invalid request:"));
    assert!(detail(&body).contains("missing field `data`"));
}

#[tokio::test]
async fn test_invalid_json_is_a_client_error() {
    let (status, body) = send(unreachable_app(), post_metrics(r#"{"data": {"metrics": ["#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(detail(&body).starts_with("Invalid request:"));
}

#[tokio::test]
async fn test_wrong_content_type_is_a_client_error() {
    let request = Request::builder()
        .method("POST")
        .uri("/health_metric")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(r#"{"data": {"metrics": []}}"#))
        .unwrap();

    let (status, body) = send(unreachable_app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(detail(&body).starts_with("Invalid request:"));
}

#[tokio::test]
async fn test_unreachable_database_is_a_server_error() {
    let (status, body) = send(unreachable_app(), post_metrics(r#"{"data": {"metrics": []}}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(detail(&body).starts_with("Database error:"));
}

//! Health endpoint integration tests.

mod common;

use axum::http::{header, HeaderValue, StatusCode};
use common::TestHarness;

#[tokio::test]
async fn health_check_returns_ok() {
    let harness = TestHarness::new().await;

    let response = harness.server.get("/health").await;

    response.assert_status_ok();
}

#[tokio::test]
async fn health_check_reports_database() {
    let harness = TestHarness::new().await;

    let response = harness.server.get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "coupon-service");
    assert_eq!(body["database"]["backend"], "sqlite");
    assert_eq!(body["database"]["reachable"], true);
}

#[tokio::test]
async fn health_check_degrades_when_pool_closed() {
    let harness = TestHarness::new().await;
    harness.state.store.close().await;

    let response = harness.server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn cors_allows_configured_origin_only() {
    let harness = TestHarness::with_config(|config| {
        config.cors_origins = vec!["https://shop.example".into(), "not a valid origin\n".into()];
    })
    .await;

    let allowed = harness
        .server
        .get("/health")
        .add_header(header::ORIGIN, HeaderValue::from_static("https://shop.example"))
        .await;
    assert_eq!(
        allowed.header(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        "https://shop.example"
    );

    let other = harness
        .server
        .get("/health")
        .add_header(header::ORIGIN, HeaderValue::from_static("https://elsewhere.example"))
        .await;
    assert!(other
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

mod common;

use axum::http::StatusCode;
use serde_json::Value;

use common::TestApp;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let response = app.server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Server is running");
    assert!(body["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn test_unknown_route() {
    let app = TestApp::new().await;

    let response = app.server.get("/api/does-not-exist").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Route not found");
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = TestApp::new().await;

    for response in [
        app.server.get("/health").await,
        app.server.get("/api/skills").await,
    ] {
        assert_eq!(response.header("x-content-type-options"), "nosniff");
        assert_eq!(response.header("x-frame-options"), "DENY");
        assert_eq!(response.header("x-xss-protection"), "1; mode=block");
    }
}

#[tokio::test]
async fn test_cors_allows_client_origin_with_credentials() {
    let app = TestApp::new().await;

    let response = app
        .server
        .get("/health")
        .add_header("Origin", "http://localhost:3000")
        .await;

    assert_eq!(
        response.header("access-control-allow-origin"),
        "http://localhost:3000"
    );
    assert_eq!(response.header("access-control-allow-credentials"), "true");
}

#[tokio::test]
async fn test_cors_ignores_other_origins() {
    let app = TestApp::new().await;

    let response = app
        .server
        .get("/health")
        .add_header("Origin", "http://evil.example.com")
        .await;

    assert!(response
        .headers()
        .get("access-control-allow-origin")
        .is_none());
}

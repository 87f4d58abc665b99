//! Integration tests for server-level endpoints

use axum::http::{header, Method, Request, StatusCode};
use tower::ServiceExt;

mod helpers;
use helpers::{body_json, get, Caller};

#[tokio::test]
async fn test_root_endpoint() {
    let (_, app) = helpers::test_app();

    let response = app.oneshot(get("/", Caller::Anonymous)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "SecHub Server");
    assert_eq!(body["status"], "running");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_health_reports_audit_store() {
    let (_, app) = helpers::test_app();

    let response = app.oneshot(get("/health", Caller::Anonymous)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["audit_store"], "memory");
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let (_, app) = helpers::test_app();

    let response = app
        .oneshot(get("/api/v1/does-not-exist", Caller::Anonymous))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_preflight_allows_identity_headers() {
    let (_, app) = helpers::test_app();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/teachers")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-user-email,x-user-roles")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let allowed = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
        .unwrap()
        .to_str()
        .unwrap()
        .to_ascii_lowercase();
    assert!(allowed.contains("x-user-email"));
    assert!(allowed.contains("x-user-roles"));
}

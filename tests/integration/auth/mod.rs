//! Authentication integration tests

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use tower::ServiceExt;

use crate::common::{authed_request, create_test_jwt, parse_body, TestApp};

#[tokio::test]
async fn test_health_needs_no_auth() {
    let app = TestApp::new();

    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let resp = app.router().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_authorization_returns_401() {
    let app = TestApp::new();

    let req = Request::builder()
        .uri("/v1/wardrobe/items")
        .body(Body::empty())
        .unwrap();
    let resp = app.router().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = parse_body(resp).await;
    assert_eq!(body["error"]["code"], "MISSING_AUTHORIZATION");
}

#[tokio::test]
async fn test_anonymous_token_returns_401() {
    let app = TestApp::new();
    let anon = create_test_jwt("", "anon", &app.config.jwt_secret).unwrap();

    let req = authed_request(Method::GET, "/v1/wardrobe/items", &anon, None);
    let resp = app.router().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_with_wrong_secret_returns_401() {
    let app = TestApp::new();
    let forged = create_test_jwt("u1", "authenticated", "not-the-secret").unwrap();

    let req = authed_request(Method::GET, "/v1/wardrobe/items", &forged, None);
    let resp = app.router().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unauthenticated_upload_touches_no_store() {
    let app = TestApp::new();

    let req = Request::builder()
        .method(Method::POST)
        .uri("/v1/wardrobe/categories/Jeans/items")
        .body(Body::empty())
        .unwrap();
    let resp = app.router().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(app.wardrobe.recorded_puts().is_empty());
    assert!(app.catalog.records().is_empty());
}

//! Outfit recommendation handler integration tests

use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::common::{authed_request, multipart_request, parse_body, FilePart, TestApp};

#[tokio::test]
async fn test_generate_outfits_forwards_preferences() {
    let app = TestApp::new();
    let jwt = app.jwt("u1");

    let req = authed_request(
        Method::POST,
        "/v1/outfits",
        &jwt,
        Some(json!({
            "gender": "Female",
            "occasion": "Party",
            "skin_tone": "Cool",
            "body_type": "Hourglass",
            "colors": "emerald, , gold "
        })),
    );
    let resp = app.router().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = parse_body(resp).await;
    assert_eq!(body["recommendations"][0]["title"], "Party look");

    let requests = app.recommender.recorded_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].skin_tone.as_deref(), Some("Cool"));
    assert_eq!(requests[0].colors, vec!["emerald", "gold"]);
    assert_eq!(requests[0].image_url, None);
}

#[tokio::test]
async fn test_generate_outfits_with_empty_preferences() {
    let app = TestApp::new();

    let req = authed_request(Method::POST, "/v1/outfits", &app.jwt("u1"), Some(json!({})));
    let resp = app.router().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let requests = app.recommender.recorded_requests();
    assert_eq!(requests[0].gender, None);
    assert!(requests[0].colors.is_empty());
}

#[tokio::test]
async fn test_unknown_occasion_returns_400() {
    let app = TestApp::new();

    let req = authed_request(
        Method::POST,
        "/v1/outfits",
        &app.jwt("u1"),
        Some(json!({"occasion": "Gala"})),
    );
    let resp = app.router().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(app.recommender.recorded_requests().is_empty());
}

#[tokio::test]
async fn test_invalid_image_url_returns_400() {
    let app = TestApp::new();

    let req = authed_request(
        Method::POST,
        "/v1/outfits",
        &app.jwt("u1"),
        Some(json!({"image_url": "not a url"})),
    );
    let resp = app.router().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recommendation_failure_returns_502() {
    let app = TestApp::new();
    app.recommender.set_failure(Some("function crashed"));

    let req = authed_request(Method::POST, "/v1/outfits", &app.jwt("u1"), Some(json!({})));
    let resp = app.router().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(parse_body(resp).await["error"]["code"], "UPSTREAM_ERROR");
}

#[tokio::test]
async fn test_reference_upload_then_generate() {
    let app = TestApp::new();
    let jwt = app.jwt("u1");

    let req = multipart_request(
        "/v1/outfits/reference",
        &jwt,
        &[FilePart::png("file", "me.png")],
    );
    let resp = app.router().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let image_url = parse_body(resp).await["image_url"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(image_url.starts_with("mock://uploads/u1/reference/"));
    assert!(app.wardrobe.paths().is_empty());

    let req = authed_request(
        Method::POST,
        "/v1/outfits",
        &jwt,
        Some(json!({"occasion": "Casual", "image_url": "https://cdn.example.com/me.png"})),
    );
    let resp = app.router().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = parse_body(resp).await;
    assert_eq!(body["recommendations"][0]["image"], "https://cdn.example.com/me.png");
}

#[tokio::test]
async fn test_reference_upload_without_file_returns_400() {
    let app = TestApp::new();

    let req = multipart_request(
        "/v1/outfits/reference",
        &app.jwt("u1"),
        &[FilePart::png("photo", "me.png")],
    );
    let resp = app.router().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(app.uploads.recorded_puts().is_empty());
}

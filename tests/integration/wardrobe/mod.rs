//! Wardrobe item handler integration tests

use axum::http::{Method, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use wardrobe_auth::Identity;
use wardrobe_closet::{CatalogStore, Category, ItemDraft};

use crate::common::{authed_request, multipart_request, parse_body, FilePart, TestApp};

async fn list(app: &TestApp, jwt: &str, query: &str) -> Value {
    let req = authed_request(Method::GET, &format!("/v1/wardrobe/items{query}"), jwt, None);
    let resp = app.router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    parse_body(resp).await
}

async fn upload(app: &TestApp, jwt: &str, category: &str, names: &[&str]) -> (StatusCode, Value) {
    let parts: Vec<FilePart<'_>> = names.iter().map(|name| FilePart::png("files", name)).collect();
    let req = multipart_request(&format!("/v1/wardrobe/categories/{category}/items"), jwt, &parts);
    let resp = app.router().oneshot(req).await.unwrap();
    let status = resp.status();
    (status, parse_body(resp).await)
}

fn count_for(body: &Value, category: &str) -> u64 {
    body["counts"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["category"] == category)
        .and_then(|c| c["count"].as_u64())
        .unwrap()
}

mod test_upload {
    use super::*;

    #[tokio::test]
    async fn test_upload_batch_adds_items() {
        let app = TestApp::new();
        let jwt = app.jwt("u1");

        let (status, body) = upload(&app, &jwt, "Jeans", &["blue.png", "black.png"]).await;

        assert_eq!(status, StatusCode::OK);
        let outcomes = body["outcomes"].as_array().unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o["status"] == "added"));

        let listed = list(&app, &jwt, "").await;
        assert_eq!(listed["items"].as_array().unwrap().len(), 2);
        assert_eq!(count_for(&listed, "Jeans"), 2);
        assert_eq!(count_for(&listed, "Shirts"), 0);

        for path in app.wardrobe.paths() {
            assert!(path.starts_with("u1/Jeans/"), "unexpected path {path}");
        }
    }

    #[tokio::test]
    async fn test_partial_failure_reports_per_file() {
        let app = TestApp::new();
        let jwt = app.jwt("u1");
        app.wardrobe.behavior().fail_puts_matching("c.png");

        let (status, body) = upload(&app, &jwt, "Shirts", &["a.png", "b.png", "c.png"]).await;

        assert_eq!(status, StatusCode::OK);
        let outcomes = body["outcomes"].as_array().unwrap();
        let failed: Vec<&Value> = outcomes
            .iter()
            .filter(|o| o["status"] == "upload_failed")
            .collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0]["filename"], "c.png");

        let listed = list(&app, &jwt, "?category=Shirts").await;
        let names: Vec<&str> = listed["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["display_name"].as_str().unwrap())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"a"));
        assert!(names.contains(&"b"));
    }

    #[tokio::test]
    async fn test_catalog_failure_reports_orphan_path() {
        let app = TestApp::new();
        let jwt = app.jwt("u1");
        app.catalog.behavior().set_fail_all_inserts(true);

        let (status, body) = upload(&app, &jwt, "Jackets", &["parka.png"]).await;

        assert_eq!(status, StatusCode::OK);
        let outcome = &body["outcomes"][0];
        assert_eq!(outcome["status"], "catalog_insert_failed");
        let orphan = outcome["storage_path"].as_str().unwrap();
        assert!(app.wardrobe.contains(orphan));
        assert!(list(&app, &jwt, "").await["items"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_category_with_space_in_path() {
        let app = TestApp::new();
        let jwt = app.jwt("u1");

        let (status, _) = upload(&app, &jwt, "Traditional%20Wear", &["kurta.png"]).await;

        assert_eq!(status, StatusCode::OK);
        let paths = app.wardrobe.paths();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].starts_with("u1/Traditional Wear/"));
        assert!(paths[0].ends_with("-kurta.png"));
    }

    #[tokio::test]
    async fn test_unknown_category_returns_400() {
        let app = TestApp::new();
        let jwt = app.jwt("u1");

        let (status, body) = upload(&app, &jwt, "Socks", &["a.png"]).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(app.wardrobe.recorded_puts().is_empty());
    }

    #[tokio::test]
    async fn test_no_files_returns_400() {
        let app = TestApp::new();
        let jwt = app.jwt("u1");
        let parts = [FilePart::png("photo", "a.png")];

        let req = multipart_request("/v1/wardrobe/categories/Jeans/items", &jwt, &parts);
        let resp = app.router().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(app.wardrobe.recorded_puts().is_empty());
    }
}

mod test_list {
    use super::*;

    #[tokio::test]
    async fn test_first_request_loads_existing_catalog() {
        let app = TestApp::new();
        let owner = Identity::new("u1");
        for (category, name) in [(Category::Jeans, "a.png"), (Category::TShirts, "b.png")] {
            let path = format!("u1/{category}/1-{name}");
            app.catalog
                .insert(&ItemDraft::new(&owner, category, name, format!("mock://wardrobe/{path}"), path))
                .await
                .unwrap();
        }

        let body = list(&app, &app.jwt("u1"), "?category=T-Shirts").await;

        let items = body["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["category"], "T-Shirts");
        assert_eq!(count_for(&body, "Jeans"), 1);
    }

    #[tokio::test]
    async fn test_users_only_see_their_items() {
        let app = TestApp::new();
        upload(&app, &app.jwt("u1"), "Jeans", &["mine.png"]).await;

        let body = list(&app, &app.jwt("u2"), "").await;

        assert!(body["items"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_first_load_returns_502_then_recovers() {
        let app = TestApp::new();
        let jwt = app.jwt("u1");
        let owner = Identity::new("u1");
        app.catalog
            .insert(&ItemDraft::new(
                &owner,
                Category::Shirts,
                "oxford.png",
                "mock://wardrobe/u1/Shirts/1-oxford.png".to_string(),
                "u1/Shirts/1-oxford.png".to_string(),
            ))
            .await
            .unwrap();
        app.catalog.behavior().set_fail_selects(true);

        let req = authed_request(Method::GET, "/v1/wardrobe/items", &jwt, None);
        let resp = app.router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(parse_body(resp).await["error"]["code"], "UPSTREAM_ERROR");

        app.catalog.behavior().set_fail_selects(false);
        let body = list(&app, &jwt, "").await;

        assert_eq!(body["items"].as_array().unwrap().len(), 1);
        assert_eq!(count_for(&body, "Shirts"), 1);
    }

    #[tokio::test]
    async fn test_unknown_category_filter_returns_400() {
        let app = TestApp::new();
        let req = authed_request(Method::GET, "/v1/wardrobe/items?category=Hats", &app.jwt("u1"), None);

        let resp = app.router().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}

mod test_delete {
    use super::*;

    async fn uploaded_id(app: &TestApp, jwt: &str) -> Uuid {
        let (_, body) = upload(app, jwt, "Jeans", &["a.png"]).await;
        body["outcomes"][0]["item"]["id"]
            .as_str()
            .unwrap()
            .parse()
            .unwrap()
    }

    #[tokio::test]
    async fn test_delete_removes_item_everywhere() {
        let app = TestApp::new();
        let jwt = app.jwt("u1");
        let id = uploaded_id(&app, &jwt).await;

        let req = authed_request(Method::DELETE, &format!("/v1/wardrobe/items/{id}"), &jwt, None);
        let resp = app.router().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = parse_body(resp).await;
        assert!(body["storage_error"].is_null());
        assert!(body["catalog_error"].is_null());
        assert!(app.catalog.records().is_empty());
        assert!(app.wardrobe.paths().is_empty());
        assert!(list(&app, &jwt, "").await["items"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_with_storage_failure_still_removes_from_view() {
        let app = TestApp::new();
        let jwt = app.jwt("u1");
        let id = uploaded_id(&app, &jwt).await;
        app.wardrobe.behavior().set_fail_deletes(true);

        let req = authed_request(Method::DELETE, &format!("/v1/wardrobe/items/{id}"), &jwt, None);
        let resp = app.router().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = parse_body(resp).await;
        assert!(body["storage_error"].is_string());
        assert!(app.catalog.records().is_empty());
        assert_eq!(app.wardrobe.paths().len(), 1);
        assert!(list(&app, &jwt, "").await["items"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_item_returns_404() {
        let app = TestApp::new();
        let jwt = app.jwt("u1");
        let id = Uuid::new_v4();

        let req = authed_request(Method::DELETE, &format!("/v1/wardrobe/items/{id}"), &jwt, None);
        let resp = app.router().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(app.wardrobe.recorded_deletes().is_empty());
    }

    #[tokio::test]
    async fn test_cannot_delete_another_users_item() {
        let app = TestApp::new();
        let id = uploaded_id(&app, &app.jwt("u1")).await;

        let req = authed_request(
            Method::DELETE,
            &format!("/v1/wardrobe/items/{id}"),
            &app.jwt("u2"),
            None,
        );
        let resp = app.router().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(app.catalog.records().len(), 1);
    }
}

mod test_session {
    use super::*;

    #[tokio::test]
    async fn test_refresh_failure_keeps_view() {
        let app = TestApp::new();
        let jwt = app.jwt("u1");
        upload(&app, &jwt, "Jeans", &["a.png"]).await;
        app.catalog.behavior().set_fail_selects(true);

        let req = authed_request(Method::POST, "/v1/wardrobe/refresh", &jwt, None);
        let resp = app.router().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(list(&app, &jwt, "").await["items"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_picks_up_external_changes() {
        let app = TestApp::new();
        let jwt = app.jwt("u1");
        assert!(list(&app, &jwt, "").await["items"].as_array().unwrap().is_empty());

        let owner = Identity::new("u1");
        app.catalog
            .insert(&ItemDraft::new(
                &owner,
                Category::Jackets,
                "denim.png",
                "mock://wardrobe/u1/Jackets/1-denim.png".to_string(),
                "u1/Jackets/1-denim.png".to_string(),
            ))
            .await
            .unwrap();

        let req = authed_request(Method::POST, "/v1/wardrobe/refresh", &jwt, None);
        let resp = app.router().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(parse_body(resp).await["count"], 1);
        assert_eq!(count_for(&list(&app, &jwt, "").await, "Jackets"), 1);
    }

    #[tokio::test]
    async fn test_end_session_returns_204() {
        let app = TestApp::new();
        let jwt = app.jwt("u1");
        upload(&app, &jwt, "Jeans", &["a.png"]).await;

        let req = authed_request(Method::DELETE, "/v1/wardrobe/session", &jwt, None);
        let resp = app.router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        // A new session reloads from the catalog
        assert_eq!(list(&app, &jwt, "").await["items"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_event_stream_delivers_notifications_until_session_ends() {
        let app = TestApp::new();
        let jwt = app.jwt("u1");

        let req = authed_request(Method::GET, "/v1/wardrobe/events", &jwt, None);
        let events = app.router().oneshot(req).await.unwrap();
        assert_eq!(events.status(), StatusCode::OK);
        assert!(events.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/event-stream"));

        app.wardrobe.behavior().fail_puts_matching("broken.png");
        upload(&app, &jwt, "Jeans", &["a.png", "broken.png"]).await;

        let req = authed_request(Method::DELETE, "/v1/wardrobe/session", &jwt, None);
        app.router().oneshot(req).await.unwrap();

        let body = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            axum::body::to_bytes(events.into_body(), usize::MAX),
        )
        .await
        .expect("event stream did not end with the session")
        .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();

        assert_eq!(text.matches("event: notification").count(), 2);
        assert!(text.contains(r#""message":"Added a.png""#));
        assert!(text.contains(r#""message":"Upload failed!""#));
        assert!(text.contains(r#""kind":"upload_failed""#));
    }

    #[tokio::test]
    async fn test_reconcile_removes_old_orphans() {
        let app = TestApp::new();
        let jwt = app.jwt("u1");
        upload(&app, &jwt, "Jeans", &["kept.png"]).await;
        app.wardrobe.insert_object("u1/Jeans/1000-orphan.png", vec![1]);

        let req = authed_request(Method::POST, "/v1/wardrobe/reconcile", &jwt, None);
        let resp = app.router().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = parse_body(resp).await;
        assert_eq!(body["scanned"], 2);
        assert_eq!(body["removed"][0], "u1/Jeans/1000-orphan.png");
        assert!(!app.wardrobe.contains("u1/Jeans/1000-orphan.png"));
        assert_eq!(app.wardrobe.paths().len(), 1);
    }
}

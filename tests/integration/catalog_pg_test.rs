//! Postgres catalog store integration tests
//!
//! Require a database reachable at TEST_DATABASE_URL (or DATABASE_URL);
//! run with `cargo test -p wardrobe-integration-tests -- --ignored`.

#![allow(dead_code)]

mod common;

use sqlx::PgPool;
use uuid::Uuid;
use wardrobe_auth::Identity;
use wardrobe_closet::{CatalogStore, Category, ItemDraft, PgCatalogStore};
use wardrobe_common::RepositoryError;

use crate::common::TestConfig;

async fn store() -> PgCatalogStore {
    let config = TestConfig::from_env();
    let pool = PgPool::connect(&config.database_url)
        .await
        .expect("Failed to connect to test database");
    let store = PgCatalogStore::new(pool);
    store.migrate().await.expect("Failed to run migrations");
    store
}

/// Unique owner per test so runs never see each other's rows
fn new_owner() -> Identity {
    Identity::new(format!("test-{}", Uuid::new_v4()))
}

fn draft(owner: &Identity, category: Category, name: &str) -> ItemDraft {
    let path = format!("{}/{}/{}-{}", owner.id(), category, chrono::Utc::now().timestamp_millis(), name);
    ItemDraft::new(owner, category, name, format!("https://cdn.example.com/{path}"), path)
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_insert_returns_assigned_fields() {
    let store = store().await;
    let owner = new_owner();

    let record = store
        .insert(&draft(&owner, Category::TraditionalWear, "kurta.png"))
        .await
        .unwrap();

    assert_eq!(record.owner, owner.id());
    assert_eq!(record.category, Category::TraditionalWear);
    assert_eq!(record.display_name, "kurta");
    assert!(record.storage_path.contains("/Traditional Wear/"));
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_select_by_owner_is_scoped_and_ordered() {
    let store = store().await;
    let owner = new_owner();
    let other = new_owner();

    let first = store.insert(&draft(&owner, Category::Jeans, "a.png")).await.unwrap();
    let second = store.insert(&draft(&owner, Category::Shirts, "b.png")).await.unwrap();
    store.insert(&draft(&other, Category::Jeans, "c.png")).await.unwrap();

    let records = store.select_by_owner(owner.id()).await.unwrap();

    let ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_duplicate_storage_path_is_already_exists() {
    let store = store().await;
    let owner = new_owner();
    let item = draft(&owner, Category::Jackets, "parka.png");

    store.insert(&item).await.unwrap();
    let err = store.insert(&item).await.unwrap_err();

    assert!(matches!(err, RepositoryError::AlreadyExists));
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_delete_by_id() {
    let store = store().await;
    let owner = new_owner();
    let record = store.insert(&draft(&owner, Category::TShirts, "tee.png")).await.unwrap();

    store.delete_by_id(record.id).await.unwrap();
    store.delete_by_id(record.id).await.unwrap();

    assert!(store.select_by_owner(owner.id()).await.unwrap().is_empty());
}

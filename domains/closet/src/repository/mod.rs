//! Catalog store implementations for the Closet domain

pub mod items;
pub mod mock;

use uuid::Uuid;
use wardrobe_common::RepositoryError;

use crate::domain::entities::{ItemDraft, ItemRecord};

pub use items::PgCatalogStore;
pub use mock::MockCatalogStore;

/// Embedded schema migrations for the Postgres catalog
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

/// Relational catalog of wardrobe items
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// Insert one record; the store assigns `id` and `created_at`.
    async fn insert(&self, draft: &ItemDraft) -> Result<ItemRecord, RepositoryError>;

    /// All records owned by `owner`, oldest first
    async fn select_by_owner(&self, owner: &str) -> Result<Vec<ItemRecord>, RepositoryError>;

    /// Delete a record by id. Deleting a missing id is not an error.
    async fn delete_by_id(&self, id: Uuid) -> Result<(), RepositoryError>;
}

//! Postgres catalog store over the `wardrobe_items` table

use sqlx::PgPool;
use uuid::Uuid;
use wardrobe_common::RepositoryError;

use super::CatalogStore;
use crate::domain::entities::{ItemDraft, ItemRecord};

/// All columns in the wardrobe_items table, used for SELECT and RETURNING clauses.
const ITEM_COLUMNS: &str = "\
    id, user_id, category, name, \
    image_url, storage_path, created_at";

#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply pending schema migrations
    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        super::MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| RepositoryError::Unavailable(format!("Migration failed: {e}")))
    }
}

#[async_trait::async_trait]
impl CatalogStore for PgCatalogStore {
    async fn insert(&self, draft: &ItemDraft) -> Result<ItemRecord, RepositoryError> {
        let query = format!(
            "INSERT INTO wardrobe_items (user_id, category, name, image_url, storage_path) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {ITEM_COLUMNS}"
        );
        let record = sqlx::query_as::<_, ItemRecord>(&query)
            .bind(&draft.owner)
            .bind(draft.category)
            .bind(&draft.display_name)
            .bind(&draft.media_url)
            .bind(&draft.storage_path)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    RepositoryError::AlreadyExists
                }
                other => RepositoryError::Connection(other),
            })?;

        Ok(record)
    }

    async fn select_by_owner(&self, owner: &str) -> Result<Vec<ItemRecord>, RepositoryError> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM wardrobe_items \
             WHERE user_id = $1 ORDER BY created_at ASC, id ASC"
        );
        let records = sqlx::query_as::<_, ItemRecord>(&query)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM wardrobe_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(item_id = %id, "Catalog delete matched no rows");
        }
        Ok(())
    }
}

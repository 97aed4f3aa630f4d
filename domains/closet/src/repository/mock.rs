//! In-memory catalog store with programmable failures
//!
//! Used by unit tests and by the `mock` catalog provider for local
//! development without a database.

use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use uuid::Uuid;
use wardrobe_common::RepositoryError;

use super::CatalogStore;
use crate::domain::entities::{ItemDraft, ItemRecord};

/// Programmable behavior for the mock catalog.
///
/// Insert rules match on substrings of the draft's storage path.
#[derive(Debug, Default)]
pub struct MockCatalogBehavior {
    failing_inserts: RwLock<Vec<String>>,
    fail_all_inserts: RwLock<bool>,
    fail_selects: RwLock<bool>,
    fail_deletes: RwLock<bool>,
    select_delay: RwLock<Option<Duration>>,
}

impl MockCatalogBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail inserts whose storage path contains `fragment`
    pub fn fail_inserts_matching(&self, fragment: &str) {
        self.failing_inserts
            .write()
            .unwrap()
            .push(fragment.to_string());
    }

    pub fn set_fail_all_inserts(&self, fail: bool) {
        *self.fail_all_inserts.write().unwrap() = fail;
    }

    pub fn set_fail_selects(&self, fail: bool) {
        *self.fail_selects.write().unwrap() = fail;
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        *self.fail_deletes.write().unwrap() = fail;
    }

    /// Hold every owner query for `delay` before answering
    pub fn set_select_delay(&self, delay: Option<Duration>) {
        *self.select_delay.write().unwrap() = delay;
    }

    /// Reset to default behavior
    pub fn reset(&self) {
        self.failing_inserts.write().unwrap().clear();
        *self.fail_all_inserts.write().unwrap() = false;
        *self.fail_selects.write().unwrap() = false;
        *self.fail_deletes.write().unwrap() = false;
        *self.select_delay.write().unwrap() = None;
    }

    fn insert_fails(&self, path: &str) -> bool {
        *self.fail_all_inserts.read().unwrap()
            || self
                .failing_inserts
                .read()
                .unwrap()
                .iter()
                .any(|fragment| path.contains(fragment.as_str()))
    }

    fn select_delay(&self) -> Option<Duration> {
        *self.select_delay.read().unwrap()
    }
}

/// Mock catalog store with programmable behavior
#[derive(Debug, Clone, Default)]
pub struct MockCatalogStore {
    behavior: Arc<MockCatalogBehavior>,
    records: Arc<Mutex<Vec<ItemRecord>>>,
}

impl MockCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the shared behavior for configuration
    pub fn behavior(&self) -> &Arc<MockCatalogBehavior> {
        &self.behavior
    }

    /// Seed a record directly, bypassing behavior rules
    pub fn seed(&self, record: ItemRecord) {
        self.records.lock().unwrap().push(record);
    }

    /// Snapshot of every stored record
    pub fn records(&self) -> Vec<ItemRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.records.lock().unwrap().iter().any(|r| r.id == id)
    }
}

fn lock_error<T>(e: std::sync::PoisonError<T>) -> RepositoryError {
    RepositoryError::Unavailable(format!("mock catalog lock poisoned: {e}"))
}

#[async_trait::async_trait]
impl CatalogStore for MockCatalogStore {
    async fn insert(&self, draft: &ItemDraft) -> Result<ItemRecord, RepositoryError> {
        if self.behavior.insert_fails(&draft.storage_path) {
            tracing::debug!(path = %draft.storage_path, "Mock catalog: simulated insert failure");
            return Err(RepositoryError::Unavailable(format!(
                "Simulated insert failure for {}",
                draft.storage_path
            )));
        }

        let mut records = self.records.lock().map_err(lock_error)?;
        if records
            .iter()
            .any(|r| r.storage_path == draft.storage_path)
        {
            return Err(RepositoryError::AlreadyExists);
        }

        let record = draft.clone().into_record();
        records.push(record.clone());
        Ok(record)
    }

    async fn select_by_owner(&self, owner: &str) -> Result<Vec<ItemRecord>, RepositoryError> {
        if let Some(delay) = self.behavior.select_delay() {
            tokio::time::sleep(delay).await;
        }

        if *self.behavior.fail_selects.read().map_err(lock_error)? {
            return Err(RepositoryError::Unavailable(
                "Simulated select failure".to_string(),
            ));
        }

        let records = self.records.lock().map_err(lock_error)?;
        let mut owned: Vec<ItemRecord> = records
            .iter()
            .filter(|r| r.owner == owner)
            .cloned()
            .collect();
        owned.sort_by_key(|r| r.created_at);
        Ok(owned)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), RepositoryError> {
        if *self.behavior.fail_deletes.read().map_err(lock_error)? {
            return Err(RepositoryError::Unavailable(format!(
                "Simulated delete failure for {id}"
            )));
        }

        self.records.lock().map_err(lock_error)?.retain(|r| r.id != id);
        Ok(())
    }
}

//! Mock Object Store Implementation
//!
//! Programmable in-memory store for testing storage workflows:
//! - `MockObjectStore`: keeps objects in memory and records operations
//! - `MockStorageBehavior`: forced failures and per-path delays

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use crate::{validate_path, ObjectStore, StorageError};

/// Programmable behavior for the mock object store.
///
/// Path rules match on substrings so tests can target a single file
/// by its name without knowing the timestamp prefix.
#[derive(Debug, Default)]
pub struct MockStorageBehavior {
    failing_puts: RwLock<Vec<String>>,
    fail_all_puts: RwLock<bool>,
    fail_deletes: RwLock<bool>,
    fail_lists: RwLock<bool>,
    put_delays: RwLock<Vec<(String, Duration)>>,
}

impl MockStorageBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every put whose path contains `fragment`
    pub fn fail_puts_matching(&self, fragment: &str) {
        self.failing_puts.write().unwrap().push(fragment.to_string());
    }

    /// Fail every put
    pub fn set_fail_all_puts(&self, fail: bool) {
        *self.fail_all_puts.write().unwrap() = fail;
    }

    /// Fail every delete
    pub fn set_fail_deletes(&self, fail: bool) {
        *self.fail_deletes.write().unwrap() = fail;
    }

    /// Fail every list
    pub fn set_fail_lists(&self, fail: bool) {
        *self.fail_lists.write().unwrap() = fail;
    }

    /// Delay puts whose path contains `fragment`
    pub fn delay_puts_matching(&self, fragment: &str, delay: Duration) {
        self.put_delays
            .write()
            .unwrap()
            .push((fragment.to_string(), delay));
    }

    /// Reset to default behavior
    pub fn reset(&self) {
        self.failing_puts.write().unwrap().clear();
        *self.fail_all_puts.write().unwrap() = false;
        *self.fail_deletes.write().unwrap() = false;
        *self.fail_lists.write().unwrap() = false;
        self.put_delays.write().unwrap().clear();
    }

    fn put_fails(&self, path: &str) -> bool {
        *self.fail_all_puts.read().unwrap()
            || self
                .failing_puts
                .read()
                .unwrap()
                .iter()
                .any(|fragment| path.contains(fragment.as_str()))
    }

    fn put_delay(&self, path: &str) -> Option<Duration> {
        self.put_delays
            .read()
            .unwrap()
            .iter()
            .find(|(fragment, _)| path.contains(fragment.as_str()))
            .map(|(_, delay)| *delay)
    }
}

/// A stored object
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Mock object store with programmable behavior
#[derive(Debug, Clone)]
pub struct MockObjectStore {
    bucket: String,
    behavior: Arc<MockStorageBehavior>,
    objects: Arc<Mutex<BTreeMap<String, StoredObject>>>,
    puts: Arc<Mutex<Vec<String>>>,
    deletes: Arc<Mutex<Vec<String>>>,
}

impl MockObjectStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            behavior: Arc::new(MockStorageBehavior::new()),
            objects: Arc::new(Mutex::new(BTreeMap::new())),
            puts: Arc::new(Mutex::new(Vec::new())),
            deletes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get the shared behavior for configuration
    pub fn behavior(&self) -> &Arc<MockStorageBehavior> {
        &self.behavior
    }

    /// Seed an object directly, bypassing behavior rules
    pub fn insert_object(&self, path: &str, bytes: Vec<u8>) {
        self.objects.lock().unwrap().insert(
            path.to_string(),
            StoredObject {
                bytes,
                content_type: "application/octet-stream".to_string(),
            },
        );
    }

    /// Whether an object exists at `path`
    pub fn contains(&self, path: &str) -> bool {
        self.objects.lock().unwrap().contains_key(path)
    }

    /// Get a stored object
    pub fn object(&self, path: &str) -> Option<StoredObject> {
        self.objects.lock().unwrap().get(path).cloned()
    }

    /// All stored paths, sorted
    pub fn paths(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    /// Paths of every attempted put, in call order
    pub fn recorded_puts(&self) -> Vec<String> {
        self.puts.lock().unwrap().clone()
    }

    /// Paths of every attempted delete, in call order
    pub fn recorded_deletes(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }
}

fn lock_error<T>(e: std::sync::PoisonError<T>) -> StorageError {
    StorageError::Request(format!("mock store lock poisoned: {e}"))
}

#[async_trait::async_trait]
impl ObjectStore for MockObjectStore {
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        validate_path(path)?;
        self.puts.lock().map_err(lock_error)?.push(path.to_string());

        if let Some(delay) = self.behavior.put_delay(path) {
            tokio::time::sleep(delay).await;
        }

        if self.behavior.put_fails(path) {
            tracing::debug!(path = %path, "Mock storage: simulated upload failure");
            return Err(StorageError::Response(format!(
                "Simulated upload failure for {}",
                path
            )));
        }

        let mut objects = self.objects.lock().map_err(lock_error)?;
        if objects.contains_key(path) {
            return Err(StorageError::Response(format!(
                "The resource already exists: {}",
                path
            )));
        }
        objects.insert(
            path.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        tracing::debug!(path = %path, "Mock storage: object stored");
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("mock://{}/{}", self.bucket, path)
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        validate_path(path)?;
        self.deletes.lock().map_err(lock_error)?.push(path.to_string());

        if *self.behavior.fail_deletes.read().map_err(lock_error)? {
            return Err(StorageError::Response(format!(
                "Simulated delete failure for {}",
                path
            )));
        }

        self.objects.lock().map_err(lock_error)?.remove(path);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        if *self.behavior.fail_lists.read().map_err(lock_error)? {
            return Err(StorageError::Response("Simulated list failure".to_string()));
        }

        let folder = format!("{}/", prefix.trim_end_matches('/'));
        let objects = self.objects.lock().map_err(lock_error)?;
        Ok(objects
            .keys()
            .filter(|path| {
                path.strip_prefix(&folder)
                    .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
            })
            .cloned()
            .collect())
    }
}

//! Upload-and-catalog workflow
//!
//! Coordinates the object store (photo bytes) and the catalog store
//! (records) and keeps a local view of the owner's items:
//! - `upload_batch`: concurrent per-file upload then catalog insert
//! - `fetch_catalog`: replace the view with the owner's records
//! - `delete_item`: best-effort storage then catalog delete
//! - `items_by_category`: filtered, restartable view of the items
//!
//! Outcomes are published as [`Notification`]s. The two stores are not
//! transactional: a failed insert after a successful upload leaves the
//! blob in place (see [`crate::reconcile`]).

use std::sync::{Arc, Mutex, PoisonError};

use futures::future::join_all;
use serde::Serialize;
use tokio::sync::{broadcast, watch};
use uuid::Uuid;
use wardrobe_auth::Identity;
use wardrobe_storage::ObjectStore;

use crate::domain::entities::{
    storage_path, Category, ItemDraft, ItemRecord, StampSequence, UploadFile,
};
use crate::domain::notifications::{DeleteStage, Notification};
use crate::error::WorkflowError;
use crate::reconcile::OrphanReconciler;
use crate::repository::CatalogStore;

/// Buffered notifications per subscriber before the oldest are dropped
const NOTIFICATION_CAPACITY: usize = 256;

/// Result of one file in a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Added {
        filename: String,
        item: ItemRecord,
    },
    UploadFailed {
        filename: String,
        error: String,
    },
    /// The blob is stored at `storage_path` but has no catalog record
    CatalogInsertFailed {
        filename: String,
        storage_path: String,
        error: String,
    },
}

impl FileOutcome {
    pub fn filename(&self) -> &str {
        match self {
            FileOutcome::Added { filename, .. }
            | FileOutcome::UploadFailed { filename, .. }
            | FileOutcome::CatalogInsertFailed { filename, .. } => filename,
        }
    }

    pub fn is_added(&self) -> bool {
        matches!(self, FileOutcome::Added { .. })
    }
}

/// Per-file outcomes of a batch, in completion order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    /// Records added by this batch
    pub fn added(&self) -> Vec<&ItemRecord> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                FileOutcome::Added { item, .. } => Some(item),
                _ => None,
            })
            .collect()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_added()).count()
    }
}

/// Result of a delete. Store failures are reported, never raised.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteReport {
    pub id: Uuid,
    pub storage_error: Option<String>,
    pub catalog_error: Option<String>,
}

impl DeleteReport {
    /// Whether both stores confirmed the delete
    pub fn is_clean(&self) -> bool {
        self.storage_error.is_none() && self.catalog_error.is_none()
    }
}

/// Items of one category, backed by a snapshot of the view.
///
/// Iterating does not consume it; `iter()` can be called any number of
/// times and always yields the same sequence.
#[derive(Debug, Clone)]
pub struct CategoryItems {
    category: Category,
    snapshot: Arc<Vec<ItemRecord>>,
}

impl CategoryItems {
    pub fn category(&self) -> Category {
        self.category
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemRecord> + '_ {
        let category = self.category;
        self.snapshot
            .iter()
            .filter(move |item| item.category == category)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn to_vec(&self) -> Vec<ItemRecord> {
        self.iter().cloned().collect()
    }
}

impl<'a> IntoIterator for &'a CategoryItems {
    type Item = &'a ItemRecord;
    type IntoIter = Box<dyn Iterator<Item = &'a ItemRecord> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Upload-and-catalog workflow bound to one local item view
pub struct WardrobeWorkflow {
    objects: Arc<dyn ObjectStore>,
    catalog: Arc<dyn CatalogStore>,
    items: watch::Sender<Arc<Vec<ItemRecord>>>,
    notifications: broadcast::Sender<Notification>,
    stamps: StampSequence,
}

impl WardrobeWorkflow {
    pub fn new(objects: Arc<dyn ObjectStore>, catalog: Arc<dyn CatalogStore>) -> Self {
        let (items, _) = watch::channel(Arc::new(Vec::new()));
        let (notifications, _) = broadcast::channel(NOTIFICATION_CAPACITY);
        Self {
            objects,
            catalog,
            items,
            notifications,
            stamps: StampSequence::new(),
        }
    }

    /// Subscribe to notifications emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }

    /// Observe the item view
    pub fn watch_items(&self) -> watch::Receiver<Arc<Vec<ItemRecord>>> {
        self.items.subscribe()
    }

    /// Current item view
    pub fn items(&self) -> Arc<Vec<ItemRecord>> {
        self.items.borrow().clone()
    }

    /// Find an item in the view
    pub fn find(&self, id: Uuid) -> Option<ItemRecord> {
        self.items.borrow().iter().find(|item| item.id == id).cloned()
    }

    /// Items of `category`, in view order
    pub fn items_by_category(&self, category: Category) -> CategoryItems {
        CategoryItems {
            category,
            snapshot: self.items(),
        }
    }

    /// Item count per category, every category included
    pub fn category_counts(&self) -> Vec<(Category, usize)> {
        let items = self.items();
        Category::ALL
            .into_iter()
            .map(|category| {
                let count = items.iter().filter(|i| i.category == category).count();
                (category, count)
            })
            .collect()
    }

    /// Empty the view, e.g. on sign-out
    pub fn clear(&self) {
        self.items.send_if_modified(|items| {
            if items.is_empty() {
                return false;
            }
            *items = Arc::new(Vec::new());
            true
        });
    }

    /// Orphan reconciler over the same stores
    pub fn reconciler(&self) -> OrphanReconciler {
        OrphanReconciler::new(self.objects.clone(), self.catalog.clone())
    }

    /// Upload each file then record it in the catalog.
    ///
    /// Files are processed concurrently and fail independently; the
    /// report lists outcomes in completion order. Only an absent owner
    /// fails the call as a whole, before anything is touched.
    pub async fn upload_batch(
        &self,
        owner: Option<&Identity>,
        category: Category,
        files: Vec<UploadFile>,
    ) -> Result<BatchReport, WorkflowError> {
        let owner = owner.ok_or(WorkflowError::Unauthenticated)?;
        let total = files.len();
        tracing::info!(owner = %owner, category = %category, files = total, "Uploading batch");

        let completed = Mutex::new(Vec::with_capacity(total));
        join_all(files.into_iter().map(|file| {
            let completed = &completed;
            async move {
                let outcome = self.upload_one(owner, category, file).await;
                completed
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(outcome);
            }
        }))
        .await;

        let report = BatchReport {
            outcomes: completed.into_inner().unwrap_or_else(PoisonError::into_inner),
        };
        tracing::info!(
            owner = %owner,
            category = %category,
            added = report.added().len(),
            failed = report.failed_count(),
            "Batch finished"
        );
        Ok(report)
    }

    async fn upload_one(&self, owner: &Identity, category: Category, file: UploadFile) -> FileOutcome {
        let path = storage_path(owner, category, self.stamps.next(), &file.filename);
        let content_type = file.content_type();
        let UploadFile {
            filename, bytes, ..
        } = file;

        if let Err(e) = self.objects.put(&path, bytes, &content_type).await {
            tracing::warn!(path = %path, error = %e, "Photo upload failed");
            self.notify(Notification::UploadFailed {
                filename: filename.clone(),
                reason: e.to_string(),
            });
            return FileOutcome::UploadFailed {
                filename,
                error: e.to_string(),
            };
        }

        let media_url = self.objects.public_url(&path);
        let draft = ItemDraft::new(owner, category, &filename, media_url, path.clone());

        match self.catalog.insert(&draft).await {
            Ok(item) => {
                tracing::debug!(item_id = %item.id, path = %path, "Item cataloged");
                self.items
                    .send_modify(|items| Arc::make_mut(items).push(item.clone()));
                self.notify(Notification::ItemAdded {
                    filename: filename.clone(),
                    item: item.clone(),
                });
                FileOutcome::Added { filename, item }
            }
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Catalog insert failed, stored photo has no record");
                self.notify(Notification::CatalogInsertFailed {
                    filename: filename.clone(),
                    storage_path: path.clone(),
                    reason: e.to_string(),
                });
                FileOutcome::CatalogInsertFailed {
                    filename,
                    storage_path: path,
                    error: e.to_string(),
                }
            }
        }
    }

    /// Replace the view with the owner's catalog records.
    ///
    /// On failure the view is left unchanged.
    pub async fn fetch_catalog(&self, owner: &Identity) -> Result<usize, WorkflowError> {
        match self.catalog.select_by_owner(owner.id()).await {
            Ok(records) => {
                let count = records.len();
                self.items.send_replace(Arc::new(records));
                tracing::debug!(owner = %owner, count, "Wardrobe fetched");
                Ok(count)
            }
            Err(e) => {
                tracing::error!(owner = %owner, error = %e, "Failed to fetch wardrobe");
                self.notify(Notification::FetchFailed {
                    reason: e.to_string(),
                });
                Err(WorkflowError::FetchFailed(e))
            }
        }
    }

    /// Remove an item from storage, then from the catalog, then from the
    /// view.
    ///
    /// Store failures are notified and reported but do not stop the
    /// following steps; the item always leaves the view.
    pub async fn delete_item(&self, item: &ItemRecord) -> DeleteReport {
        let storage_error = match self.objects.delete(&item.storage_path).await {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(item_id = %item.id, path = %item.storage_path, error = %e, "Storage delete failed");
                self.notify(Notification::DeleteStoreError {
                    id: item.id,
                    stage: DeleteStage::Storage,
                    reason: e.to_string(),
                });
                Some(e.to_string())
            }
        };

        let catalog_error = match self.catalog.delete_by_id(item.id).await {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(item_id = %item.id, error = %e, "Catalog delete failed");
                self.notify(Notification::DeleteStoreError {
                    id: item.id,
                    stage: DeleteStage::Catalog,
                    reason: e.to_string(),
                });
                Some(e.to_string())
            }
        };

        self.items.send_if_modified(|items| {
            let before = items.len();
            Arc::make_mut(items).retain(|i| i.id != item.id);
            items.len() != before
        });
        self.notify(Notification::ItemRemoved { id: item.id });

        DeleteReport {
            id: item.id,
            storage_error,
            catalog_error,
        }
    }

    fn notify(&self, notification: Notification) {
        // No subscribers is fine
        let _ = self.notifications.send(notification);
    }
}

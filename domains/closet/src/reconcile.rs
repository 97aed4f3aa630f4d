//! Orphaned photo cleanup
//!
//! A catalog insert that fails after a successful upload leaves a blob
//! with no record. The reconciler lists an owner's category folders and
//! removes blobs the catalog does not reference. It only runs on request.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use wardrobe_auth::Identity;
use wardrobe_storage::ObjectStore;

use crate::domain::entities::{stamp_of, Category};
use crate::error::WorkflowError;
use crate::repository::CatalogStore;

/// Blobs younger than this may belong to an upload whose catalog insert
/// has not finished yet
pub const DEFAULT_MIN_AGE: Duration = Duration::from_secs(600);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconcileReport {
    /// Blobs listed across all category folders
    pub scanned: usize,
    /// Orphans deleted
    pub removed: Vec<String>,
    /// Orphans still too recent, or with no stamp in their name
    pub skipped: Vec<String>,
    /// Folders that could not be listed and orphans that could not be deleted
    pub failed: Vec<String>,
}

pub struct OrphanReconciler {
    objects: Arc<dyn ObjectStore>,
    catalog: Arc<dyn CatalogStore>,
    min_age: Duration,
}

impl OrphanReconciler {
    pub fn new(objects: Arc<dyn ObjectStore>, catalog: Arc<dyn CatalogStore>) -> Self {
        Self {
            objects,
            catalog,
            min_age: DEFAULT_MIN_AGE,
        }
    }

    pub fn with_min_age(mut self, min_age: Duration) -> Self {
        self.min_age = min_age;
        self
    }

    /// Remove the owner's unreferenced blobs older than the minimum age
    pub async fn reconcile(&self, owner: &Identity) -> Result<ReconcileReport, WorkflowError> {
        self.reconcile_at(owner, Utc::now().timestamp_millis()).await
    }

    /// Same as [`reconcile`](Self::reconcile) with an explicit clock
    pub async fn reconcile_at(
        &self,
        owner: &Identity,
        now_ms: i64,
    ) -> Result<ReconcileReport, WorkflowError> {
        // Without the catalog every blob would look orphaned
        let records = self
            .catalog
            .select_by_owner(owner.id())
            .await
            .map_err(|e| WorkflowError::ReconcileAborted(e.to_string()))?;
        let referenced: HashSet<&str> = records.iter().map(|r| r.storage_path.as_str()).collect();
        let cutoff = now_ms - i64::try_from(self.min_age.as_millis()).unwrap_or(i64::MAX);

        let mut report = ReconcileReport::default();
        for category in Category::ALL {
            let folder = format!("{}/{}", owner.id(), category);
            let paths = match self.objects.list(&folder).await {
                Ok(paths) => paths,
                Err(e) => {
                    tracing::warn!(folder = %folder, error = %e, "Failed to list folder");
                    report.failed.push(folder);
                    continue;
                }
            };

            for path in paths {
                report.scanned += 1;
                if referenced.contains(path.as_str()) {
                    continue;
                }
                match stamp_of(&path) {
                    Some(stamp) if stamp <= cutoff => {}
                    _ => {
                        report.skipped.push(path);
                        continue;
                    }
                }
                match self.objects.delete(&path).await {
                    Ok(()) => report.removed.push(path),
                    Err(e) => {
                        tracing::warn!(path = %path, error = %e, "Failed to remove orphaned photo");
                        report.failed.push(path);
                    }
                }
            }
        }

        tracing::info!(
            owner = %owner,
            scanned = report.scanned,
            removed = report.removed.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Orphan reconciliation finished"
        );
        Ok(report)
    }
}

//! User-facing notifications emitted by the wardrobe workflow
//!
//! Every outcome the user should hear about (success or failure) is
//! published on a broadcast channel as one of these.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::ItemRecord;

/// Which store rejected a delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteStage {
    Storage,
    Catalog,
}

impl std::fmt::Display for DeleteStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteStage::Storage => write!(f, "storage"),
            DeleteStage::Catalog => write!(f, "catalog"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    ItemAdded {
        filename: String,
        item: ItemRecord,
    },
    UploadFailed {
        filename: String,
        reason: String,
    },
    /// The blob was stored but no catalog record exists for it
    CatalogInsertFailed {
        filename: String,
        storage_path: String,
        reason: String,
    },
    FetchFailed {
        reason: String,
    },
    ItemRemoved {
        id: Uuid,
    },
    DeleteStoreError {
        id: Uuid,
        stage: DeleteStage,
        reason: String,
    },
}

impl Notification {
    pub fn is_error(&self) -> bool {
        !matches!(
            self,
            Notification::ItemAdded { .. } | Notification::ItemRemoved { .. }
        )
    }

    /// Short text suitable for a toast
    pub fn message(&self) -> String {
        match self {
            Notification::ItemAdded { filename, .. } => format!("Added {filename}"),
            Notification::UploadFailed { .. } => "Upload failed!".to_string(),
            Notification::CatalogInsertFailed { .. } => {
                "Failed to save item in wardrobe".to_string()
            }
            Notification::FetchFailed { .. } => "Failed to fetch wardrobe".to_string(),
            Notification::ItemRemoved { .. } => "Item removed".to_string(),
            Notification::DeleteStoreError { stage, .. } => {
                format!("Failed to remove item from {stage}")
            }
        }
    }

    pub fn event(&self) -> NotificationEvent<'_> {
        NotificationEvent {
            notification: self,
            message: self.message(),
            error: self.is_error(),
        }
    }
}

/// Wire form of a notification: its fields plus the toast text
#[derive(Debug, Serialize)]
pub struct NotificationEvent<'a> {
    #[serde(flatten)]
    pub notification: &'a Notification,
    pub message: String,
    pub error: bool,
}

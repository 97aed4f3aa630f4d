//! Closet domain: clothing catalog, upload-and-catalog workflow, outfit planning

pub mod api;
pub mod domain;
pub mod error;
pub mod outfits;
pub mod reconcile;
pub mod registry;
pub mod repository;
pub mod session;
pub mod workflow;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{
    display_name, storage_path, Category, ItemDraft, ItemRecord, ParseCategoryError, UploadFile,
};
pub use domain::notifications::{DeleteStage, Notification, NotificationEvent};
pub use error::WorkflowError;

// Re-export workflow types
pub use outfits::{BodyType, Gender, Occasion, OutfitPlanner, OutfitPreferences, SkinTone};
pub use reconcile::{OrphanReconciler, ReconcileReport};
pub use registry::SessionRegistry;
pub use session::WardrobeSession;
pub use workflow::{BatchReport, CategoryItems, DeleteReport, FileOutcome, WardrobeWorkflow};

// Re-export repository types
pub use repository::{CatalogStore, MockCatalogStore, PgCatalogStore};

// Re-export API types
pub use api::routes;
pub use api::ClosetState;

//! Workflow errors and their HTTP mapping

use thiserror::Error;
use uuid::Uuid;
use wardrobe_common::{Error, RepositoryError};
use wardrobe_recommend::RecommendError;
use wardrobe_storage::StorageError;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Not signed in")]
    Unauthenticated,

    #[error("Failed to fetch wardrobe: {0}")]
    FetchFailed(#[source] RepositoryError),

    #[error("Item {0} is not in the wardrobe")]
    NotInView(Uuid),

    #[error("Upload failed: {0}")]
    Upload(#[from] StorageError),

    #[error("Outfit recommendation failed: {0}")]
    Recommendation(#[from] RecommendError),

    #[error("Reconciliation aborted: {0}")]
    ReconcileAborted(String),
}

impl From<WorkflowError> for Error {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Unauthenticated => Error::Authentication(err.to_string()),
            WorkflowError::NotInView(_) => Error::NotFound(err.to_string()),
            WorkflowError::FetchFailed(_)
            | WorkflowError::Upload(_)
            | WorkflowError::Recommendation(_)
            | WorkflowError::ReconcileAborted(_) => Error::Upstream(err.to_string()),
        }
    }
}

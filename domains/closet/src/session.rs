//! Session-bound wardrobe
//!
//! Ties a workflow to the identity published by a session provider. The
//! item view follows the session: it is fetched when a user signs in and
//! cleared when they sign out.

use std::sync::Arc;

use tokio::sync::watch;
use uuid::Uuid;
use wardrobe_auth::Identity;

use crate::domain::entities::{Category, UploadFile};
use crate::error::WorkflowError;
use crate::workflow::{BatchReport, DeleteReport, WardrobeWorkflow};

#[derive(Clone)]
pub struct WardrobeSession {
    workflow: Arc<WardrobeWorkflow>,
    identity: watch::Receiver<Option<Identity>>,
}

impl std::fmt::Debug for WardrobeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WardrobeSession")
            .field("identity", &*self.identity.borrow())
            .finish_non_exhaustive()
    }
}

impl WardrobeSession {
    pub fn new(workflow: Arc<WardrobeWorkflow>, identity: watch::Receiver<Option<Identity>>) -> Self {
        Self { workflow, identity }
    }

    pub fn workflow(&self) -> &Arc<WardrobeWorkflow> {
        &self.workflow
    }

    /// Identity of the signed-in user, if any
    pub fn current_identity(&self) -> Option<Identity> {
        self.identity.borrow().clone()
    }

    fn require_identity(&self) -> Result<Identity, WorkflowError> {
        self.current_identity().ok_or(WorkflowError::Unauthenticated)
    }

    /// Upload photos into `category` as the signed-in user
    pub async fn upload_batch(
        &self,
        category: Category,
        files: Vec<UploadFile>,
    ) -> Result<BatchReport, WorkflowError> {
        let identity = self.current_identity();
        self.workflow
            .upload_batch(identity.as_ref(), category, files)
            .await
    }

    /// Re-fetch the signed-in user's catalog
    pub async fn refresh(&self) -> Result<usize, WorkflowError> {
        let identity = self.require_identity()?;
        self.workflow.fetch_catalog(&identity).await
    }

    /// Delete an item currently in the view
    pub async fn delete_item(&self, id: Uuid) -> Result<DeleteReport, WorkflowError> {
        self.require_identity()?;
        let item = self.workflow.find(id).ok_or(WorkflowError::NotInView(id))?;
        Ok(self.workflow.delete_item(&item).await)
    }

    /// Keep the view in step with the session until the provider goes away.
    ///
    /// Fetches for the current identity first, then on every sign-in or
    /// user switch; clears on sign-out. Fetch failures are notified by the
    /// workflow and do not stop the loop.
    pub async fn follow(self) {
        let mut identity = self.identity.clone();
        let current = identity.borrow_and_update().clone();
        if let Some(owner) = &current {
            let _ = self.workflow.fetch_catalog(owner).await;
        }
        self.track(identity, current).await;
    }

    /// Like [`follow`](Self::follow) for a view whose owner is already
    /// known, typically because the caller loads it itself.
    ///
    /// Changes published after this session was created are applied even
    /// if they happen before the task first runs.
    pub async fn follow_changes(self, loaded_for: Option<Identity>) {
        let identity = self.identity.clone();
        self.track(identity, loaded_for).await;
    }

    async fn track(
        &self,
        mut identity: watch::Receiver<Option<Identity>>,
        mut current: Option<Identity>,
    ) {
        while identity.changed().await.is_ok() {
            let next = identity.borrow_and_update().clone();
            if next == current {
                continue;
            }

            match &next {
                Some(owner) => {
                    if current.is_some() {
                        self.workflow.clear();
                    }
                    let _ = self.workflow.fetch_catalog(owner).await;
                }
                None => self.workflow.clear(),
            }
            current = next;
        }

        tracing::debug!("Session provider closed, no longer following");
    }
}

//! Closet domain state and auth backend integration

use std::sync::Arc;

use axum::extract::FromRef;
use wardrobe_auth::AuthBackend;

use crate::outfits::OutfitPlanner;
use crate::registry::SessionRegistry;

/// Application state for the Closet domain
#[derive(Clone)]
pub struct ClosetState {
    pub sessions: SessionRegistry,
    pub planner: Arc<OutfitPlanner>,
    pub auth: AuthBackend,
}

impl FromRef<ClosetState> for AuthBackend {
    fn from_ref(state: &ClosetState) -> Self {
        state.auth.clone()
    }
}

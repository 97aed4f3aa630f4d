//! Session state observed through a watch channel
//!
//! The provider holds the current identity (`None` when signed out).
//! Subscribers receive every change; dropping a receiver unsubscribes,
//! and dropping the last provider handle closes all receivers.

use std::sync::Arc;

use tokio::sync::watch;

use crate::identity::Identity;

#[derive(Debug, Clone)]
pub struct SessionProvider {
    tx: Arc<watch::Sender<Option<Identity>>>,
}

impl SessionProvider {
    /// Create a signed-out session
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Create a session that starts signed in
    pub fn signed_in(identity: Identity) -> Self {
        let provider = Self::new();
        provider.sign_in(identity);
        provider
    }

    /// Current identity, if any
    pub fn current(&self) -> Option<Identity> {
        self.tx.borrow().clone()
    }

    /// Subscribe to identity changes
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.tx.subscribe()
    }

    /// Set the signed-in identity. Subscribers are only woken when it changes.
    pub fn sign_in(&self, identity: Identity) {
        self.tx.send_if_modified(|current| {
            if current.as_ref() == Some(&identity) {
                return false;
            }
            tracing::info!(owner = %identity, "Session signed in");
            *current = Some(identity);
            true
        });
    }

    /// Clear the session
    pub fn sign_out(&self) {
        self.tx.send_if_modified(|current| match current.take() {
            Some(identity) => {
                tracing::info!(owner = %identity, "Session signed out");
                true
            }
            None => false,
        });
    }
}

impl Default for SessionProvider {
    fn default() -> Self {
        Self::new()
    }
}

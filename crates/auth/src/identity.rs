//! The authenticated user reference that scopes wardrobe ownership

use serde::{Deserialize, Serialize};

use crate::claims::SupabaseClaims;

/// Authenticated user identity.
///
/// `id` is the auth subject; it prefixes storage paths and is stored as
/// the owner of every catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: Option<String>,
}

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}

impl From<SupabaseClaims> for Identity {
    fn from(claims: SupabaseClaims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
        }
    }
}

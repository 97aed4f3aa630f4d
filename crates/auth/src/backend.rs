//! Concrete authentication backend
//!
//! Verifies Supabase-issued session tokens and turns them into an
//! `Identity`. Identity issuance itself stays with the managed platform.

use crate::claims::SupabaseClaims;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::identity::Identity;
use crate::jwt::validate_jwt_token;

/// Concrete authentication backend.
///
/// Domain states expose this via `FromRef`:
/// ```ignore
/// impl FromRef<MyDomainState> for AuthBackend {
///     fn from_ref(state: &MyDomainState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthBackend {
    config: AuthConfig,
}

impl AuthBackend {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Verify a session token and resolve the signed-in identity.
    pub fn authenticate_jwt(&self, token: &str) -> Result<Identity, AuthError> {
        let claims: SupabaseClaims = validate_jwt_token(token, &self.config)?;

        if !claims.is_signed_in() {
            tracing::debug!(role = %claims.role, "Rejecting token without a signed-in user");
            return Err(AuthError::AnonymousSession);
        }

        let identity = Identity::from(claims);
        tracing::debug!(owner = %identity, "Session token verified");
        Ok(identity)
    }
}

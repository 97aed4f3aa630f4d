//! JWT claims issued by the Supabase auth service

use serde::{Deserialize, Serialize};

/// Role carried by tokens of signed-in users
pub(crate) const AUTHENTICATED_ROLE: &str = "authenticated";

/// JWT claims from Supabase
#[derive(Debug, Serialize, Deserialize)]
pub struct SupabaseClaims {
    /// Subject (auth user ID, the wardrobe owner)
    pub sub: String,
    /// Email
    pub email: Option<String>,
    /// Issued at
    pub iat: u64,
    /// Expires at
    pub exp: u64,
    /// Audience
    pub aud: String,
    /// Role (`authenticated` for signed-in users, `anon` for the public key)
    pub role: String,
}

impl SupabaseClaims {
    /// Whether the token belongs to a signed-in user rather than the anonymous key
    pub fn is_signed_in(&self) -> bool {
        self.role == AUTHENTICATED_ROLE && !self.sub.trim().is_empty()
    }
}

//! Session handling for the Wardrobe API
//!
//! Provides Supabase JWT validation, the `Identity` every wardrobe
//! operation is scoped to, a watch-channel `SessionProvider` for
//! observing sign-in/sign-out, and axum extractors that work with any
//! domain state implementing `FromRef<S>` for `AuthBackend`.

mod backend;
mod claims;
mod config;
mod error;
mod extractors;
mod identity;
mod jwt;
mod session;

pub use backend::AuthBackend;
pub use claims::SupabaseClaims;
pub use config::AuthConfig;
pub use error::AuthError;
pub use extractors::AuthUser;
pub use identity::Identity;
pub use session::SessionProvider;

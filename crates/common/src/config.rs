//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config. Collaborator clients
//! (storage, recommendation function) carry their own `from_env`.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Default request body limit for photo uploads (25MB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 26_214_400;

#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Catalog provider (postgres, mock)
    pub catalog_provider: String,

    /// Database connection URL (Supabase PostgreSQL), required for the postgres catalog
    pub database_url: Option<String>,

    /// Supabase JWT verification
    pub jwt_secret: String,
    pub jwt_issuer: Option<String>,
    pub jwt_audience: Option<String>,

    /// HTTP surface
    pub cors_allowed_origins: Option<String>,
    pub max_upload_bytes: usize,

    /// Runtime configuration
    pub rust_log: String,
    pub port: u16,
}

impl std::fmt::Debug for Config {
    #[mutants::skip] // Debug output only, redaction is asserted in tests
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("catalog_provider", &self.catalog_provider)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("jwt_audience", &self.jwt_audience)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("rust_log", &self.rust_log)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let catalog_provider =
            env::var("CATALOG_PROVIDER").unwrap_or_else(|_| "postgres".to_string());
        let database_url = env::var("DATABASE_URL").ok();

        if catalog_provider == "postgres" && database_url.is_none() {
            return Err(anyhow::anyhow!(
                "DATABASE_URL is required for the postgres catalog provider"
            ));
        }

        let config = Self {
            catalog_provider,
            database_url,

            jwt_secret: env::var("SUPABASE_JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("SUPABASE_JWT_SECRET is required"))?,
            jwt_issuer: env::var("SUPABASE_JWT_ISSUER").ok(),
            jwt_audience: env::var("SUPABASE_JWT_AUDIENCE").ok(),

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS").ok(),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),

            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "wardrobe=debug".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
        };

        Ok(config)
    }
}

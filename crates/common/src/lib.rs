//! Shared utilities, configuration, and error handling for Wardrobe
//!
//! This crate provides common functionality used across the Wardrobe workspace:
//! - Configuration management following 12-factor principles
//! - Error types and their HTTP mapping
//! - Repository error type shared by catalog stores
//! - Validating axum extractors

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;

pub use config::Config;
pub use db::RepositoryError;
pub use error::{Error, Result};
pub use extractors::ValidatedJson;

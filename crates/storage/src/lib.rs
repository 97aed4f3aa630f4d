//! Wardrobe Object Storage
//!
//! Durable blob storage addressed by hierarchical path:
//! - Supabase Storage REST integration for production
//! - Programmable in-memory mock for testing and development
//! - Configurable provider, project URL, service key and bucket

pub mod mock;
pub mod supabase;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    #[error("Storage configuration error: {0}")]
    Configuration(String),

    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    #[error("Storage request error: {0}")]
    Request(String),

    #[error("Storage response error: {0}")]
    Response(String),
}

/// Check that a path is a relative, `/`-separated key with no empty or
/// parent segments.
pub fn validate_path(path: &str) -> Result<(), StorageError> {
    if path.is_empty() {
        return Err(StorageError::InvalidPath("path is empty".to_string()));
    }
    if path
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(StorageError::InvalidPath(path.to_string()));
    }
    Ok(())
}

/// Object storage service configuration.
#[derive(Clone)]
pub struct StorageConfig {
    /// Storage provider (supabase, mock)
    pub provider: String,
    /// Supabase project URL
    pub base_url: String,
    /// Service role key used for storage requests
    pub service_key: String,
    /// Bucket holding the objects
    pub bucket: String,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("service_key", &"[REDACTED]")
            .field("bucket", &self.bucket)
            .finish()
    }
}

impl StorageConfig {
    /// Create storage config from environment variables.
    ///
    /// `bucket_var` names the variable holding the bucket, `default_bucket`
    /// is used when it is unset.
    pub fn from_env(bucket_var: &str, default_bucket: &str) -> Result<Self, StorageError> {
        dotenvy::dotenv().ok();

        let provider = std::env::var("STORAGE_PROVIDER").unwrap_or_else(|_| "mock".to_string());

        let base_url = std::env::var("SUPABASE_URL")
            .unwrap_or_else(|_| "http://localhost:54321".to_string());

        let service_key = std::env::var("SUPABASE_SERVICE_ROLE_KEY").unwrap_or_default();

        let bucket = std::env::var(bucket_var).unwrap_or_else(|_| default_bucket.to_string());

        if provider != "mock" && service_key.is_empty() {
            return Err(StorageError::Configuration(
                "SUPABASE_SERVICE_ROLE_KEY is required for Supabase storage".to_string(),
            ));
        }

        Ok(Self {
            provider,
            base_url,
            service_key,
            bucket,
        })
    }
}

/// Object store trait for different storage backends.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store a blob at `path`. Existing objects are not overwritten.
    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str)
        -> Result<(), StorageError>;

    /// Publicly resolvable address of the object at `path`.
    fn public_url(&self, path: &str) -> String;

    /// Remove the object at `path`.
    async fn delete(&self, path: &str) -> Result<(), StorageError>;

    /// Full paths of the objects stored directly under `prefix`.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}

/// Factory for creating ObjectStore implementations.
pub struct ObjectStoreFactory;

impl ObjectStoreFactory {
    /// Create an ObjectStore based on configuration.
    pub fn create(config: StorageConfig) -> Result<Box<dyn ObjectStore>, StorageError> {
        match config.provider.as_str() {
            "supabase" => {
                tracing::info!(bucket = %config.bucket, "Creating Supabase storage client");
                Ok(Box::new(supabase::SupabaseStorage::new(config)?))
            }
            "mock" => {
                tracing::info!(bucket = %config.bucket, "Creating mock object store");
                Ok(Box::new(mock::MockObjectStore::new(config.bucket)))
            }
            provider => Err(StorageError::Configuration(format!(
                "Unknown storage provider: {}. Supported providers: supabase, mock",
                provider
            ))),
        }
    }
}

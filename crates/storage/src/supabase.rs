//! Supabase Storage REST Client
//!
//! Talks to `{base_url}/storage/v1` with the service role key:
//! - upload:  `POST   /object/{bucket}/{path}`
//! - public:  `       /object/public/{bucket}/{path}`
//! - remove:  `DELETE /object/{bucket}` with `{"prefixes": [path]}`
//! - list:    `POST   /object/list/{bucket}`

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::{validate_path, ObjectStore, StorageConfig, StorageError};

/// Page size for list requests
const LIST_PAGE_SIZE: usize = 1000;

#[derive(Debug, Serialize)]
struct RemoveRequest<'a> {
    prefixes: [&'a str; 1],
}

#[derive(Debug, Serialize)]
struct ListRequest<'a> {
    prefix: &'a str,
    limit: usize,
    offset: usize,
}

/// Entry returned by the list endpoint. Folders come back without an id.
#[derive(Debug, Deserialize)]
struct ListEntry {
    name: String,
    id: Option<String>,
}

/// Supabase Storage client bound to one bucket.
pub struct SupabaseStorage {
    http: Client,
    base_url: Url,
    service_key: String,
    bucket: String,
}

impl SupabaseStorage {
    /// Create a new storage client from configuration.
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            StorageError::Configuration(format!("Invalid SUPABASE_URL '{}': {}", config.base_url, e))
        })?;

        if base_url.cannot_be_a_base() {
            return Err(StorageError::Configuration(format!(
                "SUPABASE_URL '{}' cannot be used as a base URL",
                config.base_url
            )));
        }

        Ok(Self {
            http: Client::new(),
            base_url,
            service_key: config.service_key,
            bucket: config.bucket,
        })
    }

    /// Build `{base}/storage/v1/object/{scope..}/{bucket}/{path..}`, encoding
    /// every segment (categories may contain spaces).
    fn endpoint(&self, scope: &[&str], path: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["storage", "v1", "object"])
                .extend(scope)
                .push(&self.bucket);
            if let Some(path) = path {
                segments.extend(path.split('/'));
            }
        }
        url
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StorageError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response body".to_string());
        Err(StorageError::Response(format!(
            "Storage API returned {}: {}",
            status, body
        )))
    }
}

#[async_trait::async_trait]
impl ObjectStore for SupabaseStorage {
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        validate_path(path)?;
        let size = bytes.len();

        let response = self
            .authorized(self.http.post(self.endpoint(&[], Some(path))))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        Self::check(response).await?;
        tracing::debug!(bucket = %self.bucket, path = %path, size, "Object uploaded");
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        self.endpoint(&["public"], Some(path)).to_string()
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        validate_path(path)?;

        let response = self
            .authorized(self.http.delete(self.endpoint(&[], None)))
            .json(&RemoveRequest { prefixes: [path] })
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        Self::check(response).await?;
        tracing::debug!(bucket = %self.bucket, path = %path, "Object removed");
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let prefix = prefix.trim_end_matches('/');
        validate_path(prefix)?;

        let mut paths = Vec::new();
        let mut offset = 0;

        loop {
            let response = self
                .authorized(self.http.post(self.endpoint(&["list"], None)))
                .json(&ListRequest {
                    prefix,
                    limit: LIST_PAGE_SIZE,
                    offset,
                })
                .send()
                .await
                .map_err(|e| StorageError::Request(e.to_string()))?;

            let entries: Vec<ListEntry> = Self::check(response)
                .await?
                .json()
                .await
                .map_err(|e| StorageError::Response(format!("Invalid list response: {}", e)))?;

            let page_len = entries.len();
            paths.extend(
                entries
                    .into_iter()
                    .filter(|entry| entry.id.is_some())
                    .map(|entry| format!("{}/{}", prefix, entry.name)),
            );

            if page_len < LIST_PAGE_SIZE {
                break;
            }
            offset += page_len;
        }

        tracing::debug!(bucket = %self.bucket, prefix = %prefix, count = paths.len(), "Objects listed");
        Ok(paths)
    }
}

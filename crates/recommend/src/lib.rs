//! Wardrobe Outfit Recommendation Service
//!
//! Outfit generation is delegated to a remote serverless function:
//! - Supabase Edge Function invocation for production
//! - Mock recommendation service for testing and development
//! - Configurable provider, project URL, key and function name

pub mod functions;
pub mod mock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Image shown when an outfit comes back without pictures
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.jpg";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecommendError {
    #[error("Recommendation configuration error: {0}")]
    Configuration(String),

    #[error("Recommendation request error: {0}")]
    Request(String),

    #[error("Recommendation response error: {0}")]
    Response(String),
}

/// Payload sent to the recommendation function.
///
/// Field names follow the function's contract (`skinTone`, `bodyType`,
/// `image_url`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub gender: Option<String>,
    pub occasion: Option<String>,
    #[serde(rename = "skinTone")]
    pub skin_tone: Option<String>,
    #[serde(rename = "bodyType")]
    pub body_type: Option<String>,
    pub colors: Vec<String>,
    pub image_url: Option<String>,
}

/// One suggested outfit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outfit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl Outfit {
    /// Pictures to show for this outfit: the image set when present,
    /// else the single image, else the placeholder.
    pub fn gallery(&self) -> Vec<&str> {
        if !self.images.is_empty() {
            return self.images.iter().map(String::as_str).collect();
        }
        vec![self.image.as_deref().unwrap_or(PLACEHOLDER_IMAGE)]
    }
}

/// Function response body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    #[serde(default)]
    pub recommendations: Vec<Outfit>,
}

/// Recommendation service configuration.
#[derive(Clone)]
pub struct RecommendConfig {
    /// Provider (supabase, mock)
    pub provider: String,
    /// Supabase project URL
    pub base_url: String,
    /// Key sent as bearer token and `apikey`
    pub api_key: String,
    /// Edge function name
    pub function_name: String,
}

impl std::fmt::Debug for RecommendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecommendConfig")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("function_name", &self.function_name)
            .finish()
    }
}

impl RecommendConfig {
    /// Create recommendation config from environment variables.
    pub fn from_env() -> Result<Self, RecommendError> {
        dotenvy::dotenv().ok();

        let provider = std::env::var("RECOMMEND_PROVIDER").unwrap_or_else(|_| "mock".to_string());

        let base_url = std::env::var("SUPABASE_URL")
            .unwrap_or_else(|_| "http://localhost:54321".to_string());

        let api_key = std::env::var("SUPABASE_SERVICE_ROLE_KEY").unwrap_or_default();

        let function_name =
            std::env::var("RECOMMEND_FUNCTION").unwrap_or_else(|_| "recommend".to_string());

        if provider != "mock" && api_key.is_empty() {
            return Err(RecommendError::Configuration(
                "SUPABASE_SERVICE_ROLE_KEY is required for the Supabase function provider"
                    .to_string(),
            ));
        }

        Ok(Self {
            provider,
            base_url,
            api_key,
            function_name,
        })
    }
}

/// Recommendation service trait for different backends.
#[async_trait::async_trait]
pub trait RecommendService: Send + Sync {
    /// Ask the remote function for outfit suggestions.
    async fn recommend(
        &self,
        request: RecommendationRequest,
    ) -> Result<RecommendationResponse, RecommendError>;
}

/// Factory for creating RecommendService implementations.
pub struct RecommendServiceFactory;

impl RecommendServiceFactory {
    pub fn create(config: RecommendConfig) -> Result<Box<dyn RecommendService>, RecommendError> {
        match config.provider.as_str() {
            "supabase" => {
                tracing::info!(function = %config.function_name, "Creating Supabase function client");
                Ok(Box::new(functions::EdgeFunctionClient::new(config)))
            }
            "mock" => {
                tracing::info!("Creating mock recommendation service");
                Ok(Box::new(mock::MockRecommendService::new()))
            }
            provider => Err(RecommendError::Configuration(format!(
                "Unknown recommendation provider: {}. Supported providers: supabase, mock",
                provider
            ))),
        }
    }
}

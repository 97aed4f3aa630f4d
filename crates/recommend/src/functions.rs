//! Supabase Edge Function Client
//!
//! POSTs the recommendation payload to
//! `{base_url}/functions/v1/{function_name}`.

use crate::{
    RecommendConfig, RecommendError, RecommendService, RecommendationRequest,
    RecommendationResponse,
};

/// Edge function client for outfit recommendations.
pub struct EdgeFunctionClient {
    http: reqwest::Client,
    function_url: String,
    api_key: String,
}

impl EdgeFunctionClient {
    /// Create a new function client from configuration.
    pub fn new(config: RecommendConfig) -> Self {
        let function_url = format!(
            "{}/functions/v1/{}",
            config.base_url.trim_end_matches('/'),
            config.function_name
        );
        Self {
            http: reqwest::Client::new(),
            function_url,
            api_key: config.api_key,
        }
    }
}

#[async_trait::async_trait]
impl RecommendService for EdgeFunctionClient {
    async fn recommend(
        &self,
        request: RecommendationRequest,
    ) -> Result<RecommendationResponse, RecommendError> {
        tracing::debug!(
            occasion = ?request.occasion,
            colors = request.colors.len(),
            with_reference = request.image_url.is_some(),
            "Invoking recommendation function"
        );

        let response = self
            .http
            .post(&self.function_url)
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| RecommendError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response body".to_string());
            return Err(RecommendError::Response(format!(
                "Recommendation function returned {}: {}",
                status, body
            )));
        }

        let parsed: RecommendationResponse = response
            .json()
            .await
            .map_err(|e| RecommendError::Response(format!("Invalid function response: {}", e)))?;

        tracing::debug!(
            outfits = parsed.recommendations.len(),
            "Recommendation function returned"
        );
        Ok(parsed)
    }
}

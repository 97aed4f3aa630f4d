//! Mock Recommendation Service Implementation
//!
//! Returns deterministic outfits derived from the request, or a
//! programmed response/failure. Records every request for assertions.

use std::sync::{Arc, Mutex, RwLock};

use crate::{
    Outfit, RecommendError, RecommendService, RecommendationRequest, RecommendationResponse,
};

/// Mock recommendation service
#[derive(Debug, Clone, Default)]
pub struct MockRecommendService {
    requests: Arc<Mutex<Vec<RecommendationRequest>>>,
    response: Arc<RwLock<Option<RecommendationResponse>>>,
    failure: Arc<RwLock<Option<String>>>,
}

impl MockRecommendService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return this response instead of the generated one
    pub fn set_response(&self, response: RecommendationResponse) {
        *self.response.write().unwrap() = Some(response);
    }

    /// Fail every call with this message (None to clear)
    pub fn set_failure(&self, message: Option<&str>) {
        *self.failure.write().unwrap() = message.map(str::to_string);
    }

    /// All recorded requests
    pub fn recorded_requests(&self) -> Vec<RecommendationRequest> {
        self.requests
            .lock()
            .expect("requests lock poisoned, a prior test panicked")
            .clone()
    }

    fn generated(request: &RecommendationRequest) -> RecommendationResponse {
        let occasion = request.occasion.as_deref().unwrap_or("Everyday");
        let palette = if request.colors.is_empty() {
            "neutral tones".to_string()
        } else {
            request.colors.join(", ")
        };

        RecommendationResponse {
            recommendations: vec![Outfit {
                title: format!("{} look", occasion),
                description: format!("A mock outfit in {}", palette),
                items: vec!["Top".to_string(), "Bottom".to_string(), "Shoes".to_string()],
                images: Vec::new(),
                image: request.image_url.clone(),
            }],
        }
    }
}

#[async_trait::async_trait]
impl RecommendService for MockRecommendService {
    async fn recommend(
        &self,
        request: RecommendationRequest,
    ) -> Result<RecommendationResponse, RecommendError> {
        tracing::debug!("Mock recommendation service: recording request");
        self.requests
            .lock()
            .map_err(|e| RecommendError::Request(format!("requests lock poisoned: {e}")))?
            .push(request.clone());

        if let Some(message) = self.failure.read().unwrap().clone() {
            return Err(RecommendError::Response(message));
        }

        if let Some(response) = self.response.read().unwrap().clone() {
            return Ok(response);
        }

        Ok(Self::generated(&request))
    }
}

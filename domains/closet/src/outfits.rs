//! Outfit planning
//!
//! Collects style preferences, optionally stores a reference photo in the
//! uploads bucket, and asks the recommendation function for outfits.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use wardrobe_auth::Identity;
use wardrobe_recommend::{Outfit, RecommendService, RecommendationRequest};
use wardrobe_storage::ObjectStore;

use crate::domain::entities::{StampSequence, UploadFile};
use crate::error::WorkflowError;

/// Folder under the owner's prefix holding reference photos
const REFERENCE_FOLDER: &str = "reference";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Occasion {
    Casual,
    Office,
    Party,
    Wedding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkinTone {
    Warm,
    Cool,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyType {
    Pear,
    Apple,
    Rectangle,
    Hourglass,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
        }
    }
}

impl std::fmt::Display for Occasion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Occasion::Casual => write!(f, "Casual"),
            Occasion::Office => write!(f, "Office"),
            Occasion::Party => write!(f, "Party"),
            Occasion::Wedding => write!(f, "Wedding"),
        }
    }
}

impl std::fmt::Display for SkinTone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkinTone::Warm => write!(f, "Warm"),
            SkinTone::Cool => write!(f, "Cool"),
            SkinTone::Neutral => write!(f, "Neutral"),
        }
    }
}

impl std::fmt::Display for BodyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BodyType::Pear => write!(f, "Pear"),
            BodyType::Apple => write!(f, "Apple"),
            BodyType::Rectangle => write!(f, "Rectangle"),
            BodyType::Hourglass => write!(f, "Hourglass"),
        }
    }
}

/// Style preferences; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutfitPreferences {
    pub gender: Option<Gender>,
    pub occasion: Option<Occasion>,
    pub skin_tone: Option<SkinTone>,
    pub body_type: Option<BodyType>,
    #[serde(default)]
    pub colors: Vec<String>,
}

impl OutfitPreferences {
    /// Split comma-separated color text, trimming entries and dropping empty ones
    pub fn parse_colors(text: &str) -> Vec<String> {
        text.split(',')
            .map(str::trim)
            .filter(|color| !color.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn with_colors_text(mut self, text: &str) -> Self {
        self.colors = Self::parse_colors(text);
        self
    }

    fn to_request(&self, image_url: Option<String>) -> RecommendationRequest {
        RecommendationRequest {
            gender: self.gender.map(|g| g.to_string()),
            occasion: self.occasion.map(|o| o.to_string()),
            skin_tone: self.skin_tone.map(|s| s.to_string()),
            body_type: self.body_type.map(|b| b.to_string()),
            colors: self.colors.clone(),
            image_url,
        }
    }
}

pub struct OutfitPlanner {
    uploads: Arc<dyn ObjectStore>,
    recommender: Arc<dyn RecommendService>,
    stamps: StampSequence,
}

impl OutfitPlanner {
    pub fn new(uploads: Arc<dyn ObjectStore>, recommender: Arc<dyn RecommendService>) -> Self {
        Self {
            uploads,
            recommender,
            stamps: StampSequence::new(),
        }
    }

    /// Store a reference photo and return its public URL
    pub async fn upload_reference(
        &self,
        owner: Option<&Identity>,
        file: UploadFile,
    ) -> Result<String, WorkflowError> {
        let owner = owner.ok_or(WorkflowError::Unauthenticated)?;
        let path = format!(
            "{}/{}/{}-{}",
            owner.id(),
            REFERENCE_FOLDER,
            self.stamps.next(),
            file.filename
        );
        let content_type = file.content_type();

        self.uploads
            .put(&path, file.bytes, &content_type)
            .await
            .inspect_err(|e| tracing::warn!(path = %path, error = %e, "Reference upload failed"))?;

        tracing::debug!(path = %path, "Reference photo stored");
        Ok(self.uploads.public_url(&path))
    }

    /// Ask for outfits matching `preferences` and an optional reference photo URL
    pub async fn recommend(
        &self,
        owner: Option<&Identity>,
        preferences: &OutfitPreferences,
        image_url: Option<String>,
    ) -> Result<Vec<Outfit>, WorkflowError> {
        let owner = owner.ok_or(WorkflowError::Unauthenticated)?;
        let response = self
            .recommender
            .recommend(preferences.to_request(image_url))
            .await
            .inspect_err(|e| tracing::warn!(owner = %owner, error = %e, "Recommendation failed"))?;

        tracing::info!(
            owner = %owner,
            count = response.recommendations.len(),
            "Outfits generated"
        );
        Ok(response.recommendations)
    }
}

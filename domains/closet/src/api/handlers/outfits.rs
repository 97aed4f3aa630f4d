//! Outfit recommendation API handlers

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;
use wardrobe_auth::AuthUser;
use wardrobe_common::{Error, Result, ValidatedJson};
use wardrobe_recommend::Outfit;

use super::read_files;
use crate::api::middleware::ClosetState;
use crate::outfits::{BodyType, Gender, Occasion, OutfitPreferences, SkinTone};

/// Multipart field carrying the reference photo
const FILE_FIELD: &str = "file";

/// Request for generating outfits
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateOutfitsRequest {
    pub gender: Option<Gender>,
    pub occasion: Option<Occasion>,
    pub skin_tone: Option<SkinTone>,
    pub body_type: Option<BodyType>,

    /// Comma-separated color preferences
    #[serde(default)]
    #[validate(length(max = 200))]
    pub colors: String,

    /// Reference photo URL, as returned by the reference upload
    #[validate(url)]
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReferenceResponse {
    pub image_url: String,
}

#[derive(Debug, Serialize)]
pub struct OutfitsResponse {
    pub recommendations: Vec<Outfit>,
}

/// Store a reference photo for outfit generation
pub async fn upload_reference(
    AuthUser(identity): AuthUser,
    State(state): State<ClosetState>,
    multipart: Multipart,
) -> Result<Json<ReferenceResponse>> {
    let file = read_files(multipart, FILE_FIELD)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| Error::Validation(format!("No file provided in the '{FILE_FIELD}' field")))?;

    let image_url = state.planner.upload_reference(Some(&identity), file).await?;
    Ok(Json(ReferenceResponse { image_url }))
}

/// Generate outfit recommendations
pub async fn generate_outfits(
    AuthUser(identity): AuthUser,
    State(state): State<ClosetState>,
    ValidatedJson(req): ValidatedJson<GenerateOutfitsRequest>,
) -> Result<Json<OutfitsResponse>> {
    let preferences = OutfitPreferences {
        gender: req.gender,
        occasion: req.occasion,
        skin_tone: req.skin_tone,
        body_type: req.body_type,
        colors: Vec::new(),
    }
    .with_colors_text(&req.colors);

    let recommendations = state
        .planner
        .recommend(Some(&identity), &preferences, req.image_url)
        .await?;
    Ok(Json(OutfitsResponse { recommendations }))
}

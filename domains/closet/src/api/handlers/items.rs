//! Wardrobe item API handlers

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wardrobe_auth::AuthUser;
use wardrobe_common::{Error, Result};

use super::read_files;
use crate::api::middleware::ClosetState;
use crate::domain::entities::{Category, ItemRecord};
use crate::reconcile::ReconcileReport;
use crate::workflow::{BatchReport, DeleteReport};

/// Multipart field carrying the photos of an upload
const FILES_FIELD: &str = "files";

/// Query params for listing items
#[derive(Debug, Deserialize)]
pub struct ListItemsQuery {
    /// Category display string, e.g. `T-Shirts`
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
}

/// Item list response DTO
#[derive(Debug, Serialize)]
pub struct ItemListResponse {
    pub items: Vec<ItemRecord>,
    pub counts: Vec<CategoryCount>,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub count: usize,
}

fn parse_category(raw: &str) -> Result<Category> {
    raw.parse::<Category>()
        .map_err(|e| Error::Validation(e.to_string()))
}

/// List the authenticated user's items, optionally for one category
pub async fn list_items(
    AuthUser(identity): AuthUser,
    State(state): State<ClosetState>,
    Query(query): Query<ListItemsQuery>,
) -> Result<Json<ItemListResponse>> {
    let category = query.category.as_deref().map(parse_category).transpose()?;
    let session = state.sessions.session_for(&identity).await?;
    let workflow = session.workflow();

    let items = match category {
        Some(category) => workflow.items_by_category(category).to_vec(),
        None => workflow.items().to_vec(),
    };
    let counts = workflow
        .category_counts()
        .into_iter()
        .map(|(category, count)| CategoryCount { category, count })
        .collect();

    Ok(Json(ItemListResponse { items, counts }))
}

/// Upload a batch of photos into a category.
///
/// Per-file failures are reported in the body; the request itself only
/// fails for bad input or a missing session.
pub async fn upload_items(
    AuthUser(identity): AuthUser,
    State(state): State<ClosetState>,
    Path(category): Path<String>,
    multipart: Multipart,
) -> Result<Json<BatchReport>> {
    let category = parse_category(&category)?;
    let files = read_files(multipart, FILES_FIELD).await?;
    if files.is_empty() {
        return Err(Error::Validation(format!(
            "No files provided in the '{FILES_FIELD}' field"
        )));
    }

    let session = state.sessions.session_for(&identity).await?;
    let report = session.upload_batch(category, files).await?;
    Ok(Json(report))
}

/// Delete an item from storage, the catalog, and the view
pub async fn delete_item(
    AuthUser(identity): AuthUser,
    State(state): State<ClosetState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteReport>> {
    let session = state.sessions.session_for(&identity).await?;
    let report = session.delete_item(id).await?;
    Ok(Json(report))
}

/// Re-fetch the catalog into the view
pub async fn refresh(
    AuthUser(identity): AuthUser,
    State(state): State<ClosetState>,
) -> Result<Json<RefreshResponse>> {
    let session = state.sessions.session_for(&identity).await?;
    let count = session.refresh().await?;
    Ok(Json(RefreshResponse { count }))
}

/// Remove stored photos that have no catalog record
pub async fn reconcile(
    AuthUser(identity): AuthUser,
    State(state): State<ClosetState>,
) -> Result<Json<ReconcileReport>> {
    let session = state.sessions.session_for(&identity).await?;
    let report = session
        .workflow()
        .reconciler()
        .reconcile(&identity)
        .await?;
    Ok(Json(report))
}

/// End the user's wardrobe session
pub async fn end_session(
    AuthUser(identity): AuthUser,
    State(state): State<ClosetState>,
) -> StatusCode {
    state.sessions.end(identity.id()).await;
    StatusCode::NO_CONTENT
}

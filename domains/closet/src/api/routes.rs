//! Route definitions for Closet domain API

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{events, items, outfits};
use super::middleware::ClosetState;

/// Create wardrobe item routes
fn wardrobe_routes() -> Router<ClosetState> {
    Router::new()
        .route("/v1/wardrobe/items", get(items::list_items))
        .route("/v1/wardrobe/items/{id}", delete(items::delete_item))
        .route(
            "/v1/wardrobe/categories/{category}/items",
            post(items::upload_items),
        )
        .route("/v1/wardrobe/refresh", post(items::refresh))
        .route("/v1/wardrobe/reconcile", post(items::reconcile))
        .route("/v1/wardrobe/session", delete(items::end_session))
        .route("/v1/wardrobe/events", get(events::stream_notifications))
}

/// Create outfit recommendation routes
fn outfit_routes() -> Router<ClosetState> {
    Router::new()
        .route("/v1/outfits", post(outfits::generate_outfits))
        .route("/v1/outfits/reference", post(outfits::upload_reference))
}

/// Create all Closet domain API routes
pub fn routes() -> Router<ClosetState> {
    Router::new()
        .merge(wardrobe_routes())
        .merge(outfit_routes())
}

//! Wardrobe application composition root
//!
//! Builds the collaborators (object stores, catalog, recommendation
//! function) from configuration and composes the domain router.

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, http::HeaderValue, Router};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use wardrobe_auth::{AuthBackend, AuthConfig};
use wardrobe_closet::{
    CatalogStore, ClosetState, MockCatalogStore, OutfitPlanner, PgCatalogStore, SessionRegistry,
};
use wardrobe_common::Config;
use wardrobe_recommend::{RecommendConfig, RecommendService, RecommendServiceFactory};
use wardrobe_storage::{ObjectStore, ObjectStoreFactory, StorageConfig};

/// External services the application talks to
#[derive(Clone)]
pub struct Collaborators {
    /// Wardrobe photos
    pub wardrobe: Arc<dyn ObjectStore>,
    /// Outfit reference photos
    pub uploads: Arc<dyn ObjectStore>,
    pub catalog: Arc<dyn CatalogStore>,
    pub recommender: Arc<dyn RecommendService>,
}

/// Build collaborators from configuration and the environment.
///
/// With `migrate` set, pending catalog migrations are applied first.
pub async fn build_collaborators(config: &Config, migrate: bool) -> anyhow::Result<Collaborators> {
    let wardrobe = ObjectStoreFactory::create(StorageConfig::from_env(
        "STORAGE_WARDROBE_BUCKET",
        "wardrobe",
    )?)?;
    let uploads = ObjectStoreFactory::create(StorageConfig::from_env(
        "STORAGE_UPLOADS_BUCKET",
        "uploads",
    )?)?;
    let recommender = RecommendServiceFactory::create(RecommendConfig::from_env()?)?;

    let catalog: Arc<dyn CatalogStore> = match config.catalog_provider.as_str() {
        "postgres" => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required for the postgres catalog"))?;
            let pool = PgPool::connect(database_url)
                .await
                .map_err(|e| anyhow::anyhow!("Database connection failed: {}", e))?;
            tracing::info!("Database connection established");

            let store = PgCatalogStore::new(pool);
            if migrate {
                store.migrate().await?;
                tracing::info!("Catalog migrations applied");
            }
            Arc::new(store)
        }
        "mock" => {
            tracing::info!("Creating in-memory catalog");
            Arc::new(MockCatalogStore::new())
        }
        provider => {
            return Err(anyhow::anyhow!(
                "Unknown catalog provider: {}. Supported providers: postgres, mock",
                provider
            ))
        }
    };

    Ok(Collaborators {
        wardrobe: Arc::from(wardrobe),
        uploads: Arc::from(uploads),
        catalog,
        recommender: Arc::from(recommender),
    })
}

/// Create the main application router with all routes
pub fn create_app(config: &Config, collaborators: Collaborators) -> Router {
    let auth = AuthBackend::new(AuthConfig {
        jwt_secret: config.jwt_secret.clone(),
        issuer: config.jwt_issuer.clone(),
        audience: config.jwt_audience.clone(),
    });

    let closet_state = ClosetState {
        sessions: SessionRegistry::new(collaborators.wardrobe, collaborators.catalog),
        planner: Arc::new(OutfitPlanner::new(
            collaborators.uploads,
            collaborators.recommender,
        )),
        auth,
    };

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { "Wardrobe API v0.0.1-SNAPSHOT" }),
        )
        .merge(wardrobe_closet::routes().with_state(closet_state))
}

/// CORS layer for a comma-separated origin list; `*` allows any origin
pub fn build_cors_layer(origins: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.split(',').any(|origin| origin.trim() == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(allowed)
}

/// Request body limit sized for photo batches
pub fn body_limit_layer(max_bytes: usize) -> DefaultBodyLimit {
    DefaultBodyLimit::max(max_bytes)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

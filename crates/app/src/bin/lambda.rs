//! Wardrobe API - AWS Lambda Runtime

use lambda_http::{run, Error};
use tower_http::trace::TraceLayer;
use tracing::info;

use wardrobe_app::{body_limit_layer, build_collaborators, build_cors_layer, create_app};
use wardrobe_common::config::Config;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .without_time()
        .init();

    info!("Initializing Wardrobe API Lambda");

    let config = Config::from_env().map_err(|e| Error::from(format!("Configuration error: {}", e)))?;

    let collaborators = build_collaborators(&config, false)
        .await
        .map_err(|e| Error::from(format!("App initialization error: {}", e)))?;

    let cors_origins = config
        .cors_allowed_origins
        .clone()
        .ok_or_else(|| Error::from("CORS_ALLOWED_ORIGINS environment variable is required"))?;

    let app = create_app(&config, collaborators)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&cors_origins))
        .layer(body_limit_layer(config.max_upload_bytes));

    info!("Wardrobe API Lambda ready to serve requests");

    run(app).await
}

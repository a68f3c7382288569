//! Townsquare API server entry point.

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use townsquare_api::config::ServerConfig;
use townsquare_api::error::AppError;
use townsquare_api::state::AppState;
use townsquare_api::{routes, telemetry};
use townsquare_core::clock::SystemClock;
use townsquare_towns::registry::TownRegistry;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let _telemetry = telemetry::init()?;

    tracing::info!("Starting Townsquare API server");

    let config = ServerConfig::from_env()?;
    let town_map = config.load_town_map()?;
    tracing::info!(
        map = ?config.town_map_path,
        objects = town_map.objects.len(),
        "town map loaded"
    );

    // Build application state.
    let registry = Arc::new(TownRegistry::new(Arc::new(SystemClock)));
    let app_state = AppState::new(registry, Arc::new(town_map));

    // Town clients are served from any origin.
    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}

use axum::middleware;
use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    observability::init_metrics()
        .map_err(|e| eyre::eyre!("Failed to install metrics recorder: {}", e))?;

    info!(path = %config.database.path().display(), "Opening user store");
    let db = database::embedded::open_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("Store open failed: {}", e))?;

    let state = AppState { config, db };

    // Metrics are recorded per matched route, so the layer goes on the API routes only
    let api_routes = api::routes(&state)?
        .route_layer(middleware::from_fn(observability::metrics_middleware));

    let router = create_router::<openapi::ApiDoc>(api_routes)?;

    // - /health: liveness check with app name/version
    // - /ready: readiness check with a read transaction on the store
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    info!(
        timeout = ?state.config.server.shutdown_timeout,
        "Starting users API with graceful shutdown"
    );

    let server_config = state.config.server.clone();

    // The router holds its own store handles; the file closes when the last one drops
    create_production_app(app, &server_config, async move {
        info!("Server stopped, releasing app state store handle");
        drop(state);
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Users API shutdown complete");
    Ok(())
}

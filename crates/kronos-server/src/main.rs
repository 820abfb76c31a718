//! Kronos — integration dashboard API server.

use std::sync::Arc;

use kronos_composio::ComposioClient;
use kronos_core::KronosConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = KronosConfig::from_env();
    let port = config.port;

    let client = ComposioClient::new(&config.composio)
        .map_err(|e| anyhow::anyhow!("Failed to build Composio client: {}", e))?;

    let state = Arc::new(AppState::new(config, Arc::new(client)));
    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Kronos server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

//! # Atlas POS Server
//!
//! Entry point: load config, open the database, build the router, serve.

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use atlas_db::{Database, DbConfig};
use atlas_server::auth::JwtService;
use atlas_server::{api, AppState, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::load()?;
    if config.uses_default_secret() {
        warn!("Running with the development JWT secret; set ATLAS_JWT_SECRET in production");
    }

    info!(path = %config.database_path, "Opening database");
    let db = Database::new(DbConfig::new(&config.database_path)).await?;

    let state = AppState::new(db, JwtService::new(&config.jwt_secret, config.token_ttl_hours));
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!(addr = %config.listen_addr, "Atlas POS server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    // Shutdown on Ctrl+C; in-flight requests drain, open transactions
    // roll back with their connections.
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}

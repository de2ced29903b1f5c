use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use kinship::{init, init_logging};
use kinship_server::{AppState, cli::CliArgs, config::ServerConfig, create_router};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli_args = CliArgs::parse();
    let log_level = cli_args.log_level.clone();

    let server_config = ServerConfig::from_cli_and_env(cli_args)?;

    // Stderr only, until the configured subscriber is installed
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    let mut kinship_config =
        tracing::subscriber::with_default(bootstrap, || server_config.load_kinship_config())?;

    if let Some(level) = log_level {
        kinship_config.logging.level = level.parse().map_err(anyhow::Error::msg)?;
    }
    let _log_guard = init_logging(&kinship_config.logging)?;

    info!("Starting Kinship server v{}", kinship::VERSION);
    info!(port = server_config.port, "Server configuration loaded");

    let manager = init(kinship_config).await?;
    info!("Friendship manager initialized");

    let app_state = Arc::new(AppState::new(manager, server_config.clone()));

    let app = create_router(app_state.clone())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], server_config.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down, closing store");
    app_state.manager.close().await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

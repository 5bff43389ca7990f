//! Live score server binary.

use std::sync::Arc;

use livescore_core::{AdminGate, ScoreBoard};
use livescore_server::config::ServerConfig;
use livescore_server::{app, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::load()?;
    config.validate()?;
    let addr = config.socket_addr()?;

    let board = Arc::new(ScoreBoard::with_config(config.hub_config()));
    let state = AppState {
        board: Arc::clone(&board),
        gate: Arc::new(AdminGate::new(config.admin_token)),
    };

    let heartbeat = board.hub().spawn_heartbeat_task();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server running on http://{}", addr);

    // Closing the hub first ends every event stream, so the graceful
    // drain below is not held up by open subscriptions.
    let shutdown_board = Arc::clone(&board);
    axum::serve(listener, app(state))
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutting down");
            shutdown_board.shutdown();
        })
        .await?;

    heartbeat.abort();
    Ok(())
}

/// Completes when the process receives ctrl-c.
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
}

//! chat-hub server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use chat_hub::app_state::AppState;
use chat_hub::config::{ChatConfig, LogFormat};
use chat_hub::hub::Hub;
use chat_hub::server::{build_app, shutdown_signal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ChatConfig::from_env().context("invalid configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting chat-hub");

    // Start the hub and wire services around it
    let (hub, hub_task) = Hub::spawn(config.hub_command_capacity);
    let app = build_app(AppState::from_config(&config, hub.clone()));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    // Close every live connection's queue, then wait for the loop to exit
    hub.shutdown().await;
    if let Err(e) = hub_task.await {
        tracing::warn!(error = %e, "hub task ended abnormally");
    }
    tracing::info!("chat-hub stopped");

    Ok(())
}

//! dummy-ca - local stand-in for step-ca
//!
//! Serves the endpoints the provider consumes from memory, for acceptance
//! runs without a real CA.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tracing::info;

use stepca_provider::dummy_ca;
use stepca_provider::logging::init_logging;
use stepca_provider::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    let _log_guard = init_logging(&config.logging);

    let addr: SocketAddr = format!("{}:{}", config.dummy_ca.host, config.dummy_ca.port)
        .parse()
        .context("Invalid dummy CA listen address")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("dummy CA listening on http://{}", addr);

    axum::serve(listener, dummy_ca::router())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Dummy CA server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
    info!("dummy CA shutting down");
}

//! # prontuario-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the sanctions catalog. Configuration is
//! read from the environment; see [`prontuario_api::config`].

use prontuario_api::config::{AppConfig, LogFormat};
use prontuario_api::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    // Initialize structured tracing.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::debug!(?config, "configuration loaded");

    let addr = config.socket_addr();
    let state = AppState::bootstrap(config).await.map_err(|e| {
        tracing::error!("Bootstrap failed: {e}");
        e
    })?;

    let app = prontuario_api::app(state);

    tracing::info!("Prontuario API listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

mod config;
mod documents;
mod errors;
mod extractors;
mod interview;
mod llm_client;
mod recordings;
mod routes;
mod session;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::build_provider;
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing provider API key)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM provider
    let llm = build_provider(&config.provider).context("Failed to build LLM client")?;
    info!(
        "LLM client initialized (provider: {}, model: {})",
        llm.name(),
        llm.model()
    );

    // Recordings land here; create it now so a bad path fails at startup
    tokio::fs::create_dir_all(&config.recordings_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create recordings directory {}",
                config.recordings_dir.display()
            )
        })?;
    info!("Recordings directory: {}", config.recordings_dir.display());

    // Build app state
    let state = AppState {
        llm,
        sessions: SessionStore::new(config.max_sessions),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

mod config;
mod converter;
mod document;
mod errors;
mod export;
mod generation;
mod layout;
mod models;
mod registry;
mod routes;
mod state;
mod workbook;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::registry::FileRegistry;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .with_context(|| format!("Cannot create output dir {}", config.output_dir.display()))?;
    info!("Output directory: {}", config.output_dir.display());
    if !config.template_path.exists() {
        warn!("Template {} not found; GET /template will 404", config.template_path.display());
    }

    // Initialize PDF converter (CloudConvert by default, PDF_BACKEND selects another)
    let converter = converter::from_config(&config)?;

    // Build app state
    let state = AppState::new(config.clone(), converter);
    spawn_sweeper(
        state.files.clone(),
        config.output_dir.clone(),
        config.sweep_interval,
    );

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins)?);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Allow-list when origins are configured, permissive otherwise.
fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    if origins.is_empty() {
        return Ok(CorsLayer::permissive());
    }
    let origins = origins
        .iter()
        .map(|o| HeaderValue::from_str(o).with_context(|| format!("Invalid CORS origin '{o}'")))
        .collect::<Result<Vec<_>>>()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any))
}

/// Periodically expires download tokens and deletes their files, along with
/// any stale work directory that was never registered.
fn spawn_sweeper(files: Arc<FileRegistry>, output_dir: PathBuf, interval: std::time::Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval.max(std::time::Duration::from_secs(1)));
        loop {
            ticker.tick().await;
            let files = files.clone();
            let output_dir = output_dir.clone();
            let sweep = move || {
                files.sweep();
                files.sweep_orphans(&output_dir);
            };
            if let Err(e) = tokio::task::spawn_blocking(sweep).await {
                warn!("File sweep task failed: {e}");
            }
        }
    });
}

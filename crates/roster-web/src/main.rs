use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

mod error;
mod handlers;
mod models;
mod state;
mod upload;

use state::AppState;

/// Routes of the converter API.
pub(crate) fn build_router(state: Arc<AppState>, body_limit: usize) -> Router {
    Router::new()
        .route(
            "/api/create-sheet",
            post(handlers::create_sheet::create_sheet),
        )
        .route("/api/health", get(handlers::health::health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // Resolve configuration: env vars > config file > defaults
    let config = roster_core::config_file::load_config();
    let bind_addr = std::env::var("ROSTER_BIND_ADDR").unwrap_or_else(|_| config.bind_addr());
    let uploads_dir = std::env::var("ROSTER_UPLOADS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| config.uploads_dir());
    let output_dir = std::env::var("ROSTER_OUTPUT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| config.output_dir());

    for dir in [&uploads_dir, &output_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory {}", dir.display()))?;
    }

    let state = Arc::new(AppState {
        backend: roster_ingest::default_backend()?,
        settings: config.convert_settings(),
        uploads_dir,
        output_dir,
    });
    tracing::info!(
        uploads = %state.uploads_dir.display(),
        output = %state.output_dir.display(),
        "directories ready"
    );

    let app = build_router(state, config.body_limit_bytes());

    let addr: SocketAddr = bind_addr
        .parse()
        .with_context(|| format!("invalid bind address '{}'", bind_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

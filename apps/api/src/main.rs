mod config;
mod errors;
mod jobs;
mod models;
mod report;
mod resume;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::jobs::scraper::{JobSource, LiveJobSource, StaticJobSource};
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

    info!("Starting jobmatch API v{}", env!("CARGO_PKG_VERSION"));

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("Failed to create {}", config.upload_dir.display()))?;
    info!("Upload directory: {}", config.upload_dir.display());

    // Initialize job source (LiveJobSource by default; swap via ENABLE_LIVE_SCRAPING)
    let job_source: Arc<dyn JobSource> = if config.enable_live_scraping {
        Arc::new(LiveJobSource::new(config.scrape_timeout)?)
    } else {
        Arc::new(StaticJobSource)
    };
    info!(
        "Job source: {} (cache TTL {}s)",
        job_source.name(),
        config.job_cache_ttl.as_secs()
    );

    let state = AppState::new(config.clone(), job_source);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

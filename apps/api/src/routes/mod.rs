pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::jobs::handlers as jobs;
use crate::report::handlers as report;
use crate::resume::handlers as resume;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/health", get(health::health_handler))
        // Resume API
        .route("/api/upload", post(resume::handle_upload))
        .route("/api/bulk-process", post(resume::handle_bulk_process))
        // Job API
        .route("/api/scrape-jobs", post(jobs::handle_scrape_jobs))
        .route("/api/jobs", get(jobs::handle_get_jobs))
        .route("/api/filter-jobs", post(jobs::handle_filter_jobs))
        .route("/api/cache-status", get(jobs::handle_cache_status))
        .route("/api/refresh-jobs", post(jobs::handle_refresh_jobs))
        // Report API
        .route("/api/export-excel", post(report::handle_export_excel))
        .route(
            "/api/download-bulk-report/:fname",
            get(report::handle_download_report),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

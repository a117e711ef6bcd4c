//! Axum route handlers for the job pool.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::jobs::fallback::{fallback_jobs, is_fallback_only};
use crate::jobs::matcher::{recommend, RecommendOptions};
use crate::jobs::scraper::ScrapeQuery;
use crate::models::job::{JobMatch, JobPosting};
use crate::state::AppState;

const FILTER_TOP_N: usize = 50;

/// Renders an optional timestamp the way the job endpoints report it.
pub(crate) fn display_timestamp(at: Option<DateTime<Utc>>, missing: &str) -> String {
    at.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| missing.to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

fn default_scrape_keywords() -> String {
    "software engineer".to_string()
}

fn default_scrape_max_jobs() -> usize {
    20
}

fn default_min_match() -> f64 {
    10.0
}

#[derive(Debug, Deserialize)]
pub struct ScrapeJobsRequest {
    #[serde(default = "default_scrape_keywords")]
    pub keywords: String,
    #[serde(default)]
    pub location: String,
    #[serde(default = "default_scrape_max_jobs")]
    pub max_jobs: usize,
}

#[derive(Debug, Serialize)]
pub struct ScrapeJobsResponse {
    pub success: bool,
    pub jobs_count: usize,
    pub jobs: Vec<JobPosting>,
    /// "scraped" | "fallback"
    pub source: String,
}

#[derive(Debug, Serialize)]
pub struct JobsResponse {
    pub success: bool,
    pub jobs_count: usize,
    pub jobs: Vec<JobPosting>,
}

#[derive(Debug, Deserialize)]
pub struct FilterJobsRequest {
    #[serde(default)]
    pub skills: Vec<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub skill_filters: Vec<String>,
    #[serde(default = "default_min_match")]
    pub min_match: f64,
}

#[derive(Debug, Serialize)]
pub struct FilterJobsResponse {
    pub success: bool,
    pub jobs: Vec<JobMatch>,
    pub total_jobs: usize,
}

#[derive(Debug, Serialize)]
pub struct CacheStatusResponse {
    pub cache_age_minutes: u64,
    pub is_fresh: bool,
    pub last_updated: String,
    pub jobs_count: usize,
    pub cache_duration_minutes: u64,
}

#[derive(Debug, Serialize)]
pub struct RefreshJobsResponse {
    pub success: bool,
    pub jobs_count: usize,
    pub message: String,
    /// Unix seconds
    pub timestamp: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/scrape-jobs
///
/// Scrapes with the caller's query and installs the result as the cache.
/// Reports `fallback` when nothing was scraped or every posting came from the
/// fallback list.
pub async fn handle_scrape_jobs(
    State(state): State<AppState>,
    Json(request): Json<ScrapeJobsRequest>,
) -> Json<ScrapeJobsResponse> {
    let query = ScrapeQuery {
        keywords: request.keywords,
        location: request.location,
        max_jobs: request.max_jobs,
    };
    let scraped = state.job_source.fetch(&query).await;
    let is_fallback = scraped.is_empty() || is_fallback_only(&scraped);
    let jobs = if scraped.is_empty() { fallback_jobs() } else { scraped };

    let jobs = state.jobs.replace(jobs, is_fallback).await;

    Json(ScrapeJobsResponse {
        success: true,
        jobs_count: jobs.len(),
        jobs,
        source: if is_fallback { "fallback" } else { "scraped" }.to_string(),
    })
}

/// GET /api/jobs
pub async fn handle_get_jobs(State(state): State<AppState>) -> Json<JobsResponse> {
    let jobs = state.current_jobs(false).await;
    Json(JobsResponse {
        success: true,
        jobs_count: jobs.len(),
        jobs,
    })
}

/// POST /api/filter-jobs
///
/// Re-ranks the cached pool for a skill list with location/skill filters.
pub async fn handle_filter_jobs(
    State(state): State<AppState>,
    Json(request): Json<FilterJobsRequest>,
) -> Json<FilterJobsResponse> {
    info!(
        "Filtering: location={:?}, skills={:?}, min_match={}",
        request.location, request.skill_filters, request.min_match
    );

    let jobs = state.current_jobs(false).await;
    let options = RecommendOptions {
        top_n: FILTER_TOP_N,
        min_match: request.min_match,
        location: request.location,
        skill_filter: request.skill_filters,
    };
    let matches = recommend(&request.skills, &jobs, &options);

    Json(FilterJobsResponse {
        success: true,
        total_jobs: matches.len(),
        jobs: matches,
    })
}

/// GET /api/cache-status
pub async fn handle_cache_status(State(state): State<AppState>) -> Json<CacheStatusResponse> {
    let status = state.jobs.status().await;
    Json(CacheStatusResponse {
        cache_age_minutes: status.cache_age_minutes,
        is_fresh: status.is_fresh,
        last_updated: display_timestamp(status.last_updated, "Never"),
        jobs_count: status.jobs_count,
        cache_duration_minutes: status.cache_duration_minutes,
    })
}

/// POST /api/refresh-jobs
pub async fn handle_refresh_jobs(State(state): State<AppState>) -> Json<RefreshJobsResponse> {
    info!("Force refreshing jobs");
    let jobs = state.current_jobs(true).await;
    Json(RefreshJobsResponse {
        success: true,
        jobs_count: jobs.len(),
        message: format!("Refreshed {} jobs from live sources", jobs.len()),
        timestamp: Utc::now().timestamp_millis() as f64 / 1000.0,
    })
}

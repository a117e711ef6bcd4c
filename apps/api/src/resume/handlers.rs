//! Axum route handlers for resume upload and bulk processing.

use std::collections::BTreeSet;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::jobs::handlers::display_timestamp;
use crate::jobs::matcher::{recommend, RecommendOptions};
use crate::models::job::{JobMatch, JobPosting, UNSPECIFIED_LOCATION};
use crate::models::resume::{BulkOutcome, BulkResult};
use crate::report::workbook::build_bulk_report;
use crate::report::{file_timestamp, save_report};
use crate::resume::extract::ResumeFormat;
use crate::resume::storage::{list_resumes, sanitize_filename, save_upload};
use crate::resume::{analyze_text, extract_bytes, extract_file};
use crate::state::AppState;

const UPLOAD_FIELD: &str = "file";
const RECOMMENDATION_LIMIT: usize = 20;
const FACET_POOL_LIMIT: usize = 50;
const AVAILABLE_SKILLS_LIMIT: usize = 50;
const BULK_MATCH_LIMIT: usize = 10;
const BULK_TOP_JOBS: usize = 5;
const DEFAULT_MIN_MATCH: f64 = 10.0;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CacheInfo {
    pub last_updated: String,
    pub cache_age_minutes: u64,
    pub is_fresh: bool,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub filename: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: Vec<String>,
    pub jobs: Vec<JobMatch>,
    pub total_jobs: usize,
    pub available_locations: Vec<String>,
    pub available_skills: Vec<String>,
    pub cache_info: CacheInfo,
}

#[derive(Debug, Serialize)]
pub struct BulkProcessResponse {
    pub success: bool,
    pub processed: usize,
    pub results: Vec<BulkOutcome>,
    pub excel_report: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Distinct known locations across `matches`, sorted.
fn available_locations(matches: &[JobMatch]) -> Vec<String> {
    matches
        .iter()
        .map(|m| m.location.as_str())
        .filter(|loc| *loc != UNSPECIFIED_LOCATION)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Sorted union of required skills across `matches`, capped.
fn available_skills(matches: &[JobMatch]) -> Vec<String> {
    matches
        .iter()
        .flat_map(|m| m.required_skills.iter().map(String::as_str))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .take(AVAILABLE_SKILLS_LIMIT)
        .map(str::to_string)
        .collect()
}

/// Top recommendations at the default threshold, relaxed to 0% when nothing
/// clears it.
fn recommendations(skills: &[String], jobs: &[JobPosting]) -> Vec<JobMatch> {
    let strict = RecommendOptions {
        top_n: RECOMMENDATION_LIMIT,
        min_match: DEFAULT_MIN_MATCH,
        ..Default::default()
    };
    let matches = recommend(skills, jobs, &strict);
    if !matches.is_empty() {
        return matches;
    }

    info!("No jobs at or above {DEFAULT_MIN_MATCH}% match, lowering threshold");
    let relaxed = RecommendOptions {
        min_match: 0.0,
        ..strict
    };
    recommend(skills, jobs, &relaxed)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn summarize(filename: String, text: &str, jobs: &[JobPosting]) -> BulkResult {
    let profile = analyze_text(text);
    let options = RecommendOptions {
        top_n: BULK_MATCH_LIMIT,
        min_match: DEFAULT_MIN_MATCH,
        ..Default::default()
    };
    let matches = recommend(&profile.skills, jobs, &options);

    let (avg_match, top_match) = if matches.is_empty() {
        (0.0, 0.0)
    } else {
        let sum: f64 = matches.iter().map(|m| m.match_score).sum();
        let top = matches.iter().map(|m| m.match_score).fold(f64::MIN, f64::max);
        (sum / matches.len() as f64, top)
    };

    BulkResult {
        filename,
        email: profile.email,
        phone: profile.phone,
        skills_count: profile.skills.len(),
        skills: profile.skills,
        jobs_found: matches.len(),
        avg_match: round_one_decimal(avg_match),
        top_match: round_one_decimal(top_match),
        top_jobs: matches.into_iter().take(BULK_TOP_JOBS).collect(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/upload
///
/// Saves the uploaded resume, extracts contact details and skills, and
/// returns ranked jobs plus filter facets.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(UPLOAD_FIELD) {
            let name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await?;
            upload = Some((name, bytes));
            break;
        }
    }

    let (original_name, bytes) =
        upload.ok_or_else(|| AppError::Validation("No file provided".to_string()))?;
    if original_name.trim().is_empty() {
        return Err(AppError::Validation("No file selected".to_string()));
    }

    let filename = sanitize_filename(&original_name);
    let format = ResumeFormat::from_filename(&filename)
        .ok_or_else(|| AppError::Validation("Invalid file type".to_string()))?;

    save_upload(&state.config.upload_dir, &filename, &bytes).await?;

    let text = match extract_bytes(bytes.to_vec(), format).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Text extraction failed for {filename}: {e}");
            String::new()
        }
    };
    let profile = analyze_text(&text);
    info!("Extracted {} skills from {filename}", profile.skills.len());

    let jobs = state.current_jobs(false).await;
    let facet_options = RecommendOptions {
        top_n: FACET_POOL_LIMIT,
        min_match: 0.0,
        ..Default::default()
    };
    let facet_pool = recommend(&profile.skills, &jobs, &facet_options);
    let matches = recommendations(&profile.skills, &jobs);
    info!("Got {} recommendations", matches.len());

    let status = state.jobs.status().await;

    Ok(Json(UploadResponse {
        success: true,
        filename,
        email: profile.email,
        phone: profile.phone,
        skills: profile.skills,
        total_jobs: matches.len(),
        jobs: matches,
        available_locations: available_locations(&facet_pool),
        available_skills: available_skills(&facet_pool),
        cache_info: CacheInfo {
            last_updated: display_timestamp(status.last_updated, "Just now"),
            cache_age_minutes: status.cache_age_minutes,
            is_fresh: status.is_fresh,
        },
    }))
}

/// POST /api/bulk-process
///
/// Processes every resume in the upload directory and writes a summary
/// workbook next to them.
pub async fn handle_bulk_process(
    State(state): State<AppState>,
) -> Result<Json<BulkProcessResponse>, AppError> {
    let upload_dir = state.config.upload_dir.clone();
    let resumes = list_resumes(&upload_dir).await?;
    if resumes.is_empty() {
        return Err(AppError::Validation("No resume files found".to_string()));
    }

    let jobs = state.current_jobs(false).await;
    let mut results = Vec::with_capacity(resumes.len());

    for path in &resumes {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        let outcome = match extract_file(path).await {
            Ok(text) => BulkOutcome::Processed(summarize(filename, &text, &jobs)),
            Err(e) => {
                warn!("Bulk processing failed for {filename}: {e}");
                BulkOutcome::Failed {
                    filename,
                    error: e.to_string(),
                }
            }
        };
        results.push(outcome);
    }

    let report_name = format!("bulk_processing_{}.xlsx", file_timestamp());
    let rows = results.clone();
    save_report(&upload_dir, &report_name, move || build_bulk_report(&rows)).await?;
    info!("Bulk processed {} resumes", results.len());

    Ok(Json(BulkProcessResponse {
        success: true,
        processed: results.len(),
        results,
        excel_report: report_name,
    }))
}

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::job::JobMatch;
use crate::report::workbook::{build_match_report, MatchReport, VbaFeatures};
use crate::report::{file_timestamp, save_report};
use crate::resume::storage::sanitize_filename;
use crate::state::AppState;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const DEFAULT_REPORT_NAME: &str = "resume";
const MISSING_FIELD: &str = "N/A";

#[derive(Debug, Default, Deserialize)]
pub struct ExportExcelRequest {
    pub filename: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub jobs: Vec<JobMatch>,
}

#[derive(Debug, Serialize)]
pub struct ExportExcelResponse {
    pub success: bool,
    pub message: String,
    pub filename: String,
    pub filepath: String,
    pub relative_path: String,
    pub vba_features: VbaFeatures,
}

/// `job_matches_{name}_{timestamp}.xlsx`, with dots in the resume name
/// replaced so the extension stays unambiguous.
pub fn export_filename(resume_name: &str, timestamp: &str) -> String {
    let safe = sanitize_filename(resume_name).replace('.', "_");
    let safe = if safe.is_empty() {
        DEFAULT_REPORT_NAME.to_string()
    } else {
        safe
    };
    format!("job_matches_{safe}_{timestamp}.xlsx")
}

fn non_blank(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// POST /api/export-excel
pub async fn handle_export_excel(
    State(state): State<AppState>,
    Json(req): Json<ExportExcelRequest>,
) -> Result<Json<ExportExcelResponse>, AppError> {
    let report = MatchReport {
        filename: non_blank(req.filename, DEFAULT_REPORT_NAME),
        email: non_blank(req.email, MISSING_FIELD),
        phone: non_blank(req.phone, MISSING_FIELD),
        skills: req.skills,
        jobs: req.jobs,
        generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    };
    let export_name = export_filename(&report.filename, &file_timestamp());

    let upload_dir = state.config.upload_dir.clone();
    let path = save_report(&upload_dir, &export_name, move || build_match_report(&report)).await?;
    let filepath = tokio::fs::canonicalize(&path).await.unwrap_or_else(|_| path.clone());

    Ok(Json(ExportExcelResponse {
        success: true,
        message: "Excel report with VBA tools generated successfully".to_string(),
        filename: export_name,
        filepath: filepath.display().to_string(),
        relative_path: path.display().to_string(),
        vba_features: VbaFeatures::current(),
    }))
}

/// GET /api/download-bulk-report/:fname
///
/// Serves a generated report from the upload directory as an attachment.
pub async fn handle_download_report(
    State(state): State<AppState>,
    Path(fname): Path<String>,
) -> Result<Response, AppError> {
    if fname.is_empty() || sanitize_filename(&fname) != fname {
        return Err(AppError::NotFound("File not found".to_string()));
    }

    let path = state.config.upload_dir.join(&fname);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound("File not found".to_string()));
        }
        Err(e) => {
            return Err(AppError::Internal(
                anyhow::Error::new(e).context(format!("Failed to read {}", path.display())),
            ));
        }
    };

    let content_type = if fname.to_ascii_lowercase().ends_with(".xlsx") {
        XLSX_MIME
    } else {
        "application/octet-stream"
    };

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{fname}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

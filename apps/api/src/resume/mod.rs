// Resume parsing: text extraction, contact fields, skills, and the upload directory.
// Document decoding is CPU-bound and runs inside tokio::task::spawn_blocking.

pub mod extract;
pub mod fields;
pub mod handlers;
pub mod skills;
pub mod storage;

use std::path::Path;

use crate::models::resume::ResumeProfile;
use extract::{extract_text, ExtractionError, ResumeFormat};

/// Detects email, phone and skills in already-extracted resume text.
pub fn analyze_text(text: &str) -> ResumeProfile {
    ResumeProfile {
        email: fields::extract_email(text),
        phone: fields::extract_phone(text),
        skills: skills::extract_skills(text),
    }
}

/// Extracts text from in-memory resume bytes off the async executor.
pub async fn extract_bytes(bytes: Vec<u8>, format: ResumeFormat) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || extract_text(&bytes, format)).await?
}

/// Reads a saved resume from disk and extracts its text.
pub async fn extract_file(path: &Path) -> Result<String, ExtractionError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let format = ResumeFormat::from_filename(name)
        .ok_or_else(|| ExtractionError::Unsupported(name.to_string()))?;

    let bytes = tokio::fs::read(path).await?;
    extract_bytes(bytes, format).await
}

use serde::Serialize;

use crate::models::job::JobMatch;

/// Contact details and skills detected in a resume's text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResumeProfile {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: Vec<String>,
}

/// Summary of one resume processed in a bulk run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkResult {
    pub filename: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills_count: usize,
    pub skills: Vec<String>,
    pub jobs_found: usize,
    pub avg_match: f64,
    pub top_match: f64,
    pub top_jobs: Vec<JobMatch>,
}

/// Per-file outcome of a bulk run. Serialized without a tag, so a failure is
/// just `{filename, error}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BulkOutcome {
    Processed(BulkResult),
    Failed { filename: String, error: String },
}

impl BulkOutcome {
    pub fn filename(&self) -> &str {
        match self {
            BulkOutcome::Processed(result) => &result.filename,
            BulkOutcome::Failed { filename, .. } => filename,
        }
    }
}

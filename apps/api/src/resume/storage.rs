//! Upload directory handling: safe file names, saving, and listing resumes.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;

use crate::resume::extract::ResumeFormat;

/// Reduces a client-supplied file name to a safe single path component.
///
/// Keeps the last path segment, turns whitespace into `_`, drops everything
/// but ASCII alphanumerics, `.`, `_` and `-`, and strips leading `.`/`_`.
/// The result may be empty.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = base
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    cleaned.trim_start_matches(['.', '_']).to_string()
}

/// Writes an uploaded resume into `dir`, creating the directory when needed.
pub async fn save_upload(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create upload directory {}", dir.display()))?;

    let path = dir.join(filename);
    fs::write(&path, bytes)
        .await
        .with_context(|| format!("Failed to save upload {}", path.display()))?;
    Ok(path)
}

/// Lists every resume file in `dir`, sorted by file name.
pub async fn list_resumes(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut resumes = Vec::new();

    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(resumes),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", dir.display()));
        }
    };

    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let path = entry.path();
        let is_resume = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(ResumeFormat::from_filename)
            .is_some();
        if is_resume {
            resumes.push(path);
        }
    }

    resumes.sort();
    Ok(resumes)
}

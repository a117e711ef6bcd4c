// Spreadsheet export. Workbook building and saving are blocking and run inside
// tokio::task::spawn_blocking.

pub mod handlers;
pub mod workbook;

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;
use rust_xlsxwriter::{Workbook, XlsxError};

use crate::errors::AppError;

/// `YYYYmmdd_HHMMSS` in local time, used to make report file names unique.
pub fn file_timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Builds a workbook off the async executor and saves it as `dir/filename`.
pub async fn save_report<F>(dir: &Path, filename: &str, build: F) -> Result<PathBuf, AppError>
where
    F: FnOnce() -> Result<Workbook, XlsxError> + Send + 'static,
{
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create report directory {}", dir.display()))?;

    let path = dir.join(filename);
    let target = path.clone();
    tokio::task::spawn_blocking(move || build()?.save(&target))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed saving report: {e}")))??;

    tracing::info!("Saved report {}", path.display());
    Ok(path)
}

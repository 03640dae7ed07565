use std::path::{Path, PathBuf};
use std::sync::Arc;

use roster_core::storage::FileFallbackStore;
use roster_core::{Persistence, RecordStore, StoreConfig, SubmissionView};
use serde::Serialize;

use crate::error::CliError;

const DATA_DIR_NAME: &str = "roster";

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub remote_configured: bool,
    pub repository: Option<String>,
    pub document_path: Option<String>,
    pub api_base_url: Option<String>,
    pub fallback_path: String,
}

pub fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf, CliError> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    dirs::data_dir()
        .map(|dir| dir.join(DATA_DIR_NAME))
        .ok_or(CliError::DataDirUnavailable)
}

pub fn open_store(config: &StoreConfig, data_dir: &Path) -> Arc<RecordStore> {
    let fallback = Arc::new(FileFallbackStore::new(data_dir));
    Arc::new(RecordStore::new(config.clone(), fallback))
}

/// Open the submission view and populate it from the store.
pub async fn open_view(
    config: &StoreConfig,
    data_dir: &Path,
) -> Result<(SubmissionView, Persistence), CliError> {
    let store = open_store(config, data_dir);
    let mut view = SubmissionView::new(store);
    let persistence = view.load().await?;
    Ok((view, persistence))
}

pub fn status_report(config: &StoreConfig, data_dir: &Path) -> Result<StatusReport, CliError> {
    let fallback_path = FileFallbackStore::new(data_dir).slot_path(&config.fallback_slot)?;
    let configured = config.is_remote_configured();

    Ok(StatusReport {
        remote_configured: configured,
        repository: configured.then(|| config.repository.clone()),
        document_path: configured.then(|| config.document_path.clone()),
        api_base_url: configured.then(|| config.api_base_url.clone()),
        fallback_path: fallback_path.display().to_string(),
    })
}

pub fn format_status_lines(report: &StatusReport) -> Vec<String> {
    let mut lines = Vec::new();
    match (&report.repository, &report.document_path) {
        (Some(repository), Some(document_path)) if report.remote_configured => {
            lines.push(format!("Remote:   github {repository}/{document_path}"));
            if let Some(api_base_url) = &report.api_base_url {
                lines.push(format!("API:      {api_base_url}"));
            }
        }
        _ => lines.push(
            "Remote:   not configured (set ROSTER_GITHUB_REPO and ROSTER_GITHUB_TOKEN)"
                .to_string(),
        ),
    }
    lines.push(format!("Fallback: {}", report.fallback_path));
    lines
}

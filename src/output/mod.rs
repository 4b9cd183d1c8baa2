//! Output module for exporting session results and writing reports
//!
//! This module handles:
//! - Exporting results as CSV or JSON
//! - Generating markdown reports of a session
//! - Loading everything a report needs from storage

mod export;
mod markdown;

pub use export::{
    default_export_path, export_csv, export_json, write_export, ExportFormat, ExportRow,
    EXPORT_HEADERS,
};
pub use markdown::{format_markdown_report, generate_markdown_report};

use crate::analysis::CrawlResult;
use crate::storage::{SessionRecord, Storage, StorageError};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Loads a session together with its results
pub fn load_session(
    storage: &dyn Storage,
    session_id: i64,
) -> OutputResult<(SessionRecord, Vec<CrawlResult>)> {
    let session = storage.get_session(session_id)?;
    let results = storage.get_results(session_id)?;
    Ok((session, results))
}

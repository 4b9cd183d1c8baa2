//! CSV and JSON export of session results

use crate::analysis::CrawlResult;
use crate::output::OutputResult;
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Column order of every export
pub const EXPORT_HEADERS: [&str; 12] = [
    "url",
    "title",
    "meta_description",
    "h1_count",
    "h2_count",
    "word_count",
    "load_time",
    "mobile_friendly",
    "seo_score",
    "issue_count",
    "issues",
    "analyzed_at",
];

/// One exported result, flattened
///
/// Signal columns are empty (`null` in JSON) for failed analyses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub url: String,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub h1_count: Option<usize>,
    pub h2_count: Option<usize>,
    pub word_count: Option<u32>,
    pub load_time: Option<f64>,
    pub mobile_friendly: Option<bool>,
    pub seo_score: Option<u32>,
    pub issue_count: usize,
    /// Issues joined with "; "
    pub issues: String,
    pub analyzed_at: String,
}

impl From<&CrawlResult> for ExportRow {
    fn from(result: &CrawlResult) -> Self {
        let signals = result.signals.as_ref();
        Self {
            url: result.url.clone(),
            title: signals.and_then(|s| s.title.clone()),
            meta_description: signals.and_then(|s| s.meta_description.clone()),
            h1_count: signals.map(|s| s.h1_tags.len()),
            h2_count: signals.map(|s| s.h2_tags.len()),
            word_count: signals.map(|s| s.word_count),
            load_time: signals.map(|s| s.load_time),
            mobile_friendly: signals.map(|s| s.mobile_friendly),
            seo_score: result.seo_score(),
            issue_count: result.issue_count(),
            issues: result.issues.join("; "),
            analyzed_at: result.analyzed_at.to_rfc3339(),
        }
    }
}

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Default file name for a session export inside `dir`
pub fn default_export_path(dir: &Path, session_id: i64, format: ExportFormat) -> PathBuf {
    dir.join(format!("crawl_results_{}.{}", session_id, format.extension()))
}

/// Writes results as CSV
///
/// The header row is always written, so an empty result set still yields a
/// valid file.
pub fn export_csv<W: Write>(results: &[CrawlResult], writer: W) -> OutputResult<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(EXPORT_HEADERS)?;
    for result in results {
        csv_writer.serialize(ExportRow::from(result))?;
    }
    csv_writer.flush()?;

    Ok(())
}

/// Writes results as a pretty-printed JSON array
pub fn export_json<W: Write>(results: &[CrawlResult], mut writer: W) -> OutputResult<()> {
    let rows: Vec<ExportRow> = results.iter().map(ExportRow::from).collect();
    serde_json::to_writer_pretty(&mut writer, &rows)?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Writes results in `format` to a new file at `path`
pub fn write_export(results: &[CrawlResult], format: ExportFormat, path: &Path) -> OutputResult<()> {
    let file = File::create(path)?;
    match format {
        ExportFormat::Csv => export_csv(results, file),
        ExportFormat::Json => export_json(results, file),
    }?;

    tracing::info!("Exported {} result(s) to {}", results.len(), path.display());
    Ok(())
}

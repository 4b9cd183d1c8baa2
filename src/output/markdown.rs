//! Markdown session reports
//!
//! This module generates human-readable markdown reports of one session,
//! including its metadata, the issue summary, and the issues of every page.

use crate::analysis::{seo_score, CrawlResult, IssueSummary, MAX_SEO_SCORE};
use crate::output::OutputResult;
use crate::storage::SessionRecord;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the report for a session to `output_path`
pub fn generate_markdown_report(
    session: &SessionRecord,
    results: &[CrawlResult],
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_report(session, results);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    tracing::info!("Wrote report for session {} to {}", session.id, output_path.display());
    Ok(())
}

/// Formats a session report as markdown
pub fn format_markdown_report(session: &SessionRecord, results: &[CrawlResult]) -> String {
    let summary = crate::analysis::summarize(results);
    let mut md = String::new();

    md.push_str(&format!("# SEO Sweep Report: {}\n\n", session.base_url));

    md.push_str("## Session Information\n\n");
    md.push_str(&format!("- **Session ID**: {}\n", session.id));
    md.push_str(&format!("- **Status**: {}\n", session.status));
    md.push_str(&format!("- **Started**: {}\n", session.started_at));
    if let Some(completed) = &session.completed_at {
        md.push_str(&format!("- **Completed**: {}\n", completed));
    }
    md.push_str(&format!(
        "- **Limits**: {} URLs, depth {}\n",
        session.max_urls, session.max_depth
    ));
    md.push_str(&format!(
        "- **robots.txt**: {}\n",
        if session.respect_robots { "respected" } else { "ignored" }
    ));
    md.push_str(&format!("- **Config Hash**: {}\n", session.config_hash));
    if let Some(error) = &session.error_message {
        md.push_str(&format!("- **Error**: {}\n", error));
    }
    md.push('\n');

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **URLs Found**: {}\n", session.total_urls_found));
    md.push_str(&format!("- **URLs Analyzed**: {}\n", session.total_urls_analyzed));
    md.push_str(&format!("- **Issues Found**: {}\n", session.issues_found));
    md.push_str(&format!(
        "- **Pages With Issues**: {} of {} ({:.1}%)\n",
        summary.pages_with_issues, summary.total_pages, summary.issue_percentage
    ));
    md.push_str(&format!(
        "- **Average Issues Per Page**: {:.1}\n",
        summary.avg_issues_per_page
    ));
    if let Some(average) = average_score(results) {
        md.push_str(&format!("- **Average SEO Score**: {:.1}/{}\n", average, MAX_SEO_SCORE));
    }
    md.push('\n');

    push_breakdowns(&mut md, &summary);

    if !results.is_empty() {
        md.push_str("## Pages\n\n");
        for result in results {
            md.push_str(&format!("### {}\n\n", result.url));
            if let Some(signals) = &result.signals {
                md.push_str(&format!(
                    "Score {}/{}, {} words, loaded in {:.2}s\n\n",
                    seo_score(signals),
                    MAX_SEO_SCORE,
                    signals.word_count,
                    signals.load_time
                ));
            }
            if result.issues.is_empty() {
                md.push_str("No issues found.\n\n");
            } else {
                for issue in &result.issues {
                    md.push_str(&format!("- {}\n", issue));
                }
                md.push('\n');
            }
        }
    }

    md
}

/// Mean score of the successfully analyzed pages
fn average_score(results: &[CrawlResult]) -> Option<f64> {
    let scores: Vec<u32> = results.iter().filter_map(CrawlResult::seo_score).collect();
    if scores.is_empty() {
        return None;
    }
    Some(scores.iter().sum::<u32>() as f64 / scores.len() as f64)
}

fn push_breakdowns(md: &mut String, summary: &IssueSummary) {
    if !summary.issue_severities.is_empty() {
        md.push_str("## Issues by Severity\n\n");
        md.push_str("| Severity | Count |\n");
        md.push_str("|----------|-------|\n");
        for (severity, count) in &summary.issue_severities {
            md.push_str(&format!("| {} | {} |\n", severity, count));
        }
        md.push('\n');
    }

    if !summary.issue_categories.is_empty() {
        md.push_str("## Issues by Category\n\n");
        md.push_str("| Category | Count |\n");
        md.push_str("|----------|-------|\n");
        for (category, count) in &summary.issue_categories {
            md.push_str(&format!("| {} | {} |\n", category.as_str(), count));
        }
        md.push('\n');
    }

    if !summary.common_issues.is_empty() {
        md.push_str(&format!(
            "## Top {} Issues\n\n",
            summary.common_issues.len()
        ));
        md.push_str("| Issue | Pages |\n");
        md.push_str("|-------|-------|\n");
        for (issue, count) in &summary.common_issues {
            md.push_str(&format!("| {} | {} |\n", issue, count));
        }
        md.push('\n');
    }
}

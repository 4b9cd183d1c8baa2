//! SEO issue detection, classification and cross-page summaries
//!
//! Issues are plain human-readable strings. Category and severity are
//! derived from their wording, so the messages below double as the
//! classification vocabulary.

use crate::analysis::signals::PageSignals;
use crate::analysis::CrawlResult;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Number of entries in [`IssueSummary::common_issues`]
pub const COMMON_ISSUES_LIMIT: usize = 10;

/// Derives the issue list for one page, in a fixed check order
///
/// # Example
///
/// ```
/// use seo_sweep::analysis::{analyze_issues, PageSignals};
///
/// let signals = PageSignals {
///     url: "https://example.com/".to_string(),
///     title: None,
///     meta_description: None,
///     h1_tags: vec![],
///     h2_tags: vec![],
///     keywords: vec![],
///     word_count: 10,
///     load_time: 0.4,
///     mobile_friendly: true,
///     images_without_alt: vec![],
///     internal_links: 0,
///     external_links: 0,
///     robots_txt_status: "Allowed by robots.txt".to_string(),
///     respect_robots: true,
/// };
/// let issues = analyze_issues(&signals);
/// assert_eq!(issues[0], "Missing title tag");
/// ```
pub fn analyze_issues(signals: &PageSignals) -> Vec<String> {
    let mut issues = Vec::new();
    title_issues(signals.title.as_deref(), &mut issues);
    meta_description_issues(signals.meta_description.as_deref(), &mut issues);
    header_issues(&signals.h1_tags, &signals.h2_tags, &mut issues);
    performance_issues(signals.load_time, &mut issues);
    if !signals.mobile_friendly {
        issues.push("Not mobile-friendly - missing viewport meta tag".to_string());
    }
    content_issues(signals.word_count, &mut issues);
    image_issues(signals.images_without_alt.len(), &mut issues);
    issues
}

fn title_issues(title: Option<&str>, issues: &mut Vec<String>) {
    // An empty element counts as missing
    let Some(title) = title.filter(|t| !t.trim().is_empty()) else {
        issues.push("Missing title tag".to_string());
        return;
    };

    let length = title.chars().count();
    if length < 30 {
        issues.push(format!(
            "Title too short ({} chars) - should be 30-60 characters",
            length
        ));
    } else if length > 60 {
        issues.push(format!(
            "Title too long ({} chars) - should be 30-60 characters",
            length
        ));
    }

    let lower = title.to_lowercase();
    if lower == "untitled" {
        issues.push("Generic 'Untitled' title".to_string());
    } else if lower.starts_with("welcome to") {
        issues.push("Generic 'Welcome to' title".to_string());
    } else if !title.contains(['|', '-', ':']) {
        issues.push("Title lacks brand/site name separator".to_string());
    }
}

fn meta_description_issues(description: Option<&str>, issues: &mut Vec<String>) {
    let Some(description) = description.filter(|d| !d.trim().is_empty()) else {
        issues.push("Missing meta description".to_string());
        return;
    };

    let length = description.chars().count();
    if length < 120 {
        issues.push(format!(
            "Meta description too short ({} chars) - should be 120-160 characters",
            length
        ));
    } else if length > 160 {
        issues.push(format!(
            "Meta description too long ({} chars) - should be 120-160 characters",
            length
        ));
    }
}

fn header_issues(h1_tags: &[String], h2_tags: &[String], issues: &mut Vec<String>) {
    match h1_tags {
        [] => issues.push("Missing H1 tag".to_string()),
        [only] => {
            let text = only.trim();
            let length = text.chars().count();
            if text.is_empty() {
                issues.push("Empty H1 tag".to_string());
            } else if length < 20 {
                issues.push(format!("H1 too short ({} chars)", length));
            } else if length > 70 {
                issues.push(format!("H1 too long ({} chars)", length));
            }
        }
        many => issues.push(format!(
            "Multiple H1 tags ({}) - should have only one",
            many.len()
        )),
    }

    if h2_tags.is_empty() {
        issues.push("No H2 tags found - consider adding subheadings".to_string());
    } else if h2_tags.len() > 10 {
        issues.push(format!(
            "Too many H2 tags ({}) - consider restructuring content",
            h2_tags.len()
        ));
    }
}

fn performance_issues(load_time: f64, issues: &mut Vec<String>) {
    if load_time > 3.0 {
        issues.push(format!(
            "Slow page load time ({:.1}s) - should be under 3 seconds",
            load_time
        ));
    } else if load_time > 2.0 {
        issues.push(format!("Page load time could be improved ({:.1}s)", load_time));
    }
}

fn content_issues(word_count: u32, issues: &mut Vec<String>) {
    if word_count < 300 {
        issues.push(format!(
            "Low content volume ({} words) - consider adding more content",
            word_count
        ));
    } else if word_count > 3000 {
        issues.push(format!(
            "Very long content ({} words) - consider breaking into multiple pages",
            word_count
        ));
    }
}

fn image_issues(missing_alt: usize, issues: &mut Vec<String>) {
    match missing_alt {
        0 => {}
        1 => issues.push("1 image missing alt text".to_string()),
        n => issues.push(format!("{} images missing alt text", n)),
    }
}

/// Topic an issue belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    Title,
    MetaDescription,
    Headers,
    Performance,
    Mobile,
    Content,
    Images,
    Other,
}

impl IssueCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::MetaDescription => "meta_description",
            Self::Headers => "headers",
            Self::Performance => "performance",
            Self::Mobile => "mobile",
            Self::Content => "content",
            Self::Images => "images",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How urgently an issue should be fixed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl IssueSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies an issue by keyword; the first matching rule wins
pub fn categorize_issue(issue: &str) -> IssueCategory {
    let lower = issue.to_lowercase();
    let has = |needle: &str| lower.contains(needle);

    if has("title") {
        IssueCategory::Title
    } else if has("meta description") {
        IssueCategory::MetaDescription
    } else if has("h1") || has("h2") || has("heading") {
        IssueCategory::Headers
    } else if has("load time") || has("slow") {
        IssueCategory::Performance
    } else if has("mobile") {
        IssueCategory::Mobile
    } else if has("content") || has("word") {
        IssueCategory::Content
    } else if has("image") || has("alt") {
        IssueCategory::Images
    } else {
        IssueCategory::Other
    }
}

/// Rates an issue by keyword
pub fn issue_severity(issue: &str) -> IssueSeverity {
    let lower = issue.to_lowercase();
    let any = |needles: &[&str]| needles.iter().any(|needle| lower.contains(needle));

    if any(&["missing title", "missing h1", "empty title"]) {
        IssueSeverity::Critical
    } else if any(&["missing meta description", "not mobile-friendly", "slow page load"]) {
        IssueSeverity::High
    } else if any(&["too short", "too long", "multiple h1"]) {
        IssueSeverity::Medium
    } else {
        IssueSeverity::Low
    }
}

/// Issue statistics across every result of a session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueSummary {
    pub total_pages: usize,
    pub total_issues: usize,
    pub pages_with_issues: usize,
    /// Share of pages with at least one issue, in percent (1 decimal)
    pub issue_percentage: f64,
    /// 1 decimal
    pub avg_issues_per_page: f64,
    /// Counts per category, in first-seen order
    pub issue_categories: IndexMap<IssueCategory, usize>,
    /// Counts per severity, in first-seen order
    pub issue_severities: IndexMap<IssueSeverity, usize>,
    /// The most frequent issue texts, most frequent first
    pub common_issues: Vec<(String, usize)>,
}

/// Builds the cross-page summary
pub fn summarize(results: &[CrawlResult]) -> IssueSummary {
    let total_pages = results.len();
    let mut total_issues = 0;
    let mut pages_with_issues = 0;
    let mut issue_categories = IndexMap::new();
    let mut issue_severities = IndexMap::new();
    let mut occurrences: IndexMap<&str, usize> = IndexMap::new();

    for result in results {
        if !result.issues.is_empty() {
            pages_with_issues += 1;
        }
        for issue in &result.issues {
            total_issues += 1;
            *issue_categories.entry(categorize_issue(issue)).or_insert(0) += 1;
            *issue_severities.entry(issue_severity(issue)).or_insert(0) += 1;
            *occurrences.entry(issue.as_str()).or_insert(0) += 1;
        }
    }

    let mut common_issues: Vec<(String, usize)> = occurrences
        .into_iter()
        .map(|(issue, count)| (issue.to_string(), count))
        .collect();
    common_issues.sort_by(|a, b| b.1.cmp(&a.1));
    common_issues.truncate(COMMON_ISSUES_LIMIT);

    let (issue_percentage, avg_issues_per_page) = if total_pages > 0 {
        (
            round_one(pages_with_issues as f64 / total_pages as f64 * 100.0),
            round_one(total_issues as f64 / total_pages as f64),
        )
    } else {
        (0.0, 0.0)
    };

    IssueSummary {
        total_pages,
        total_issues,
        pages_with_issues,
        issue_percentage,
        avg_issues_per_page,
        issue_categories,
        issue_severities,
        common_issues,
    }
}

fn round_one(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

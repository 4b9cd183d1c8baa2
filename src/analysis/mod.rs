//! Page analysis module
//!
//! Fetches each URL a crawl returned, extracts its SEO signals and derives
//! the issue list that gets persisted.

mod issues;
mod score;
mod signals;

pub use issues::{
    analyze_issues, categorize_issue, issue_severity, summarize, IssueCategory, IssueSeverity,
    IssueSummary, COMMON_ISSUES_LIMIT,
};
pub use score::{seo_score, MAX_SEO_SCORE};
pub use signals::{
    count_words, extract_signals, top_keywords, visible_text, PageSignals, NO_SRC, TOP_KEYWORDS,
};

use crate::config::Config;
use crate::crawler::{build_http_client, fetch_url, FetchResult};
use crate::robots::RobotsCache;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Why a page could not be analyzed
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Access denied by robots.txt: {0}")]
    RobotsDenied(String),

    #[error("HTTP {0}")]
    Http(u16),

    #[error("{0}")]
    Network(String),
}

/// Outcome of analyzing one URL
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlResult {
    pub url: String,
    /// Extracted signals; `None` when analysis failed
    pub signals: Option<PageSignals>,
    /// Failure description when analysis failed
    pub error: Option<String>,
    pub issues: Vec<String>,
    pub analyzed_at: DateTime<Utc>,
}

impl CrawlResult {
    /// A successful analysis with its derived issues
    pub fn analyzed(signals: PageSignals) -> Self {
        let issues = analyze_issues(&signals);
        Self {
            url: signals.url.clone(),
            signals: Some(signals),
            error: None,
            issues,
            analyzed_at: Utc::now(),
        }
    }

    /// A failed analysis, recorded with a single "Analysis failed" issue
    pub fn failed(url: &str, error: &AnalysisError) -> Self {
        Self {
            url: url.to_string(),
            signals: None,
            error: Some(error.to_string()),
            issues: vec![format!("Analysis failed: {}", error)],
            analyzed_at: Utc::now(),
        }
    }

    /// SEO score of the page; `None` when analysis failed
    pub fn seo_score(&self) -> Option<u32> {
        self.signals.as_ref().map(seo_score)
    }

    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Fetches pages and extracts their SEO signals
///
/// Holds a robots cache for the whole session, so each domain's robots.txt
/// is read once no matter how many pages are analyzed.
#[derive(Debug)]
pub struct PageAnalyzer {
    client: Client,
    robots: RobotsCache,
    user_agent: String,
}

impl PageAnalyzer {
    /// Creates an analyzer with a fresh robots cache
    pub fn new(client: Client, user_agent: impl Into<String>, respect_robots: bool) -> Self {
        let robots = RobotsCache::new(client.clone(), respect_robots);
        Self::with_robots(client, robots, user_agent)
    }

    /// Creates an analyzer with the HTTP client and robots agent the configuration describes
    pub fn from_config(config: &Config, respect_robots: bool) -> Result<Self, reqwest::Error> {
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.crawler.request_timeout_secs),
        )?;
        Ok(Self::new(client, config.user_agent.crawler_name.clone(), respect_robots))
    }

    /// Creates an analyzer that reuses an existing robots cache
    pub fn with_robots(client: Client, robots: RobotsCache, user_agent: impl Into<String>) -> Self {
        Self {
            client,
            robots,
            user_agent: user_agent.into(),
        }
    }

    pub fn robots(&self) -> &RobotsCache {
        &self.robots
    }

    /// Analyzes one URL
    ///
    /// # Errors
    ///
    /// * `RobotsDenied` - robots.txt forbids the page (nothing is fetched)
    /// * `Http` - the server answered anything but 200
    /// * `Network` - the request failed outright
    pub async fn analyze(&mut self, url: &str) -> Result<PageSignals, AnalysisError> {
        let verdict = self.robots.allowed(url, &self.user_agent).await;
        tracing::debug!("Robots check for {}: {}", url, verdict.reason);
        if !verdict.allowed {
            return Err(AnalysisError::RobotsDenied(verdict.reason));
        }

        match fetch_url(&self.client, url).await {
            FetchResult::Success { body, elapsed, .. } => Ok(extract_signals(
                &body,
                url,
                elapsed,
                &verdict.reason,
                self.robots.is_enabled(),
            )),
            FetchResult::HttpError { status_code } => Err(AnalysisError::Http(status_code)),
            FetchResult::NetworkError { error } => Err(AnalysisError::Network(error)),
        }
    }

    /// Analyzes one URL and derives its issues, never failing
    pub async fn analyze_to_result(&mut self, url: &str) -> CrawlResult {
        match self.analyze(url).await {
            Ok(signals) => CrawlResult::analyzed(signals),
            Err(e) => {
                tracing::warn!("Analysis of {} failed: {}", url, e);
                CrawlResult::failed(url, &e)
            }
        }
    }
}

//! Session coordinator - crawl, analyze and persist one session
//!
//! This module drives a whole job end to end:
//! - Creating the session record and moving it through its statuses
//! - Running the site crawler to collect URLs
//! - Analyzing every collected URL and persisting each result
//! - Recording totals, or the error that stopped the session

use crate::analysis::PageAnalyzer;
use crate::config::Config;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::request::CrawlRequest;
use crate::crawler::site_crawler::SiteCrawler;
use crate::storage::Storage;
use crate::SweepError;
use reqwest::Client;
use std::time::Duration;

/// Totals of a finished session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOutcome {
    pub session_id: i64,
    pub urls_found: u32,
    pub urls_analyzed: u32,
    pub issues_found: u32,
}

/// Main session coordinator structure
pub struct Coordinator<S: Storage> {
    config: Config,
    config_hash: String,
    storage: S,
    client: Client,
}

impl<S: Storage> Coordinator<S> {
    /// Creates a coordinator writing to `storage`
    ///
    /// # Errors
    ///
    /// Fails only if the HTTP client cannot be built.
    pub fn new(config: Config, config_hash: impl Into<String>, storage: S) -> Result<Self, SweepError> {
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.crawler.request_timeout_secs),
        )?;

        Ok(Self {
            config,
            config_hash: config_hash.into(),
            storage,
            client,
        })
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.config.crawler.politeness_delay_ms)
    }

    /// Runs one session for `request`
    ///
    /// Analysis failures are stored as error results and never stop the
    /// session. A storage failure does: the session is marked failed (if
    /// the database still accepts that) and the error is returned.
    pub async fn run(&mut self, request: &CrawlRequest) -> Result<SessionOutcome, SweepError> {
        let session_id = self.storage.create_session(request, &self.config_hash)?;
        tracing::info!("Created session {} for {}", session_id, request.base_url());

        match self.run_session(session_id, request).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                tracing::error!("Session {} failed: {}", session_id, e);
                if let Err(mark_err) = self.storage.fail_session(session_id, &e.to_string()) {
                    tracing::warn!("Could not mark session {} failed: {}", session_id, mark_err);
                }
                Err(e)
            }
        }
    }

    async fn run_session(
        &mut self,
        session_id: i64,
        request: &CrawlRequest,
    ) -> Result<SessionOutcome, SweepError> {
        self.storage.mark_running(session_id)?;

        let agent = self.config.user_agent.crawler_name.clone();
        let delay = self.politeness_delay();

        let crawler = SiteCrawler::new(self.client.clone(), agent.clone())
            .with_politeness_delay(delay)
            .with_progress_callback(|crawled, discovered| {
                tracing::info!("Progress: {} page(s) crawled, {} URL(s) discovered", crawled, discovered);
            });

        let state = crawler.run(request).await;
        let urls = state.results(request.max_urls() as usize);
        let mut analyzer = PageAnalyzer::with_robots(self.client.clone(), state.into_robots(), agent);

        tracing::info!("Analyzing {} URL(s)", urls.len());

        let mut urls_analyzed = 0u32;
        let mut issues_found = 0u32;

        for (index, url) in urls.iter().enumerate() {
            let result = analyzer.analyze_to_result(url).await;
            if !result.is_failure() {
                urls_analyzed += 1;
                issues_found += result.issue_count() as u32;
            }
            self.storage.insert_result(session_id, &result)?;

            if index + 1 < urls.len() && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        let outcome = SessionOutcome {
            session_id,
            urls_found: urls.len() as u32,
            urls_analyzed,
            issues_found,
        };
        self.storage
            .complete_session(session_id, outcome.urls_found, urls_analyzed, issues_found)?;

        tracing::info!(
            "Session {} completed: {} found, {} analyzed, {} issue(s)",
            session_id,
            outcome.urls_found,
            urls_analyzed,
            issues_found
        );

        Ok(outcome)
    }
}

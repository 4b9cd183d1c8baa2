//! Breadth-first site traversal
//!
//! A run seeds itself from the base URL and the site's sitemaps, then walks
//! same-domain links one BFS level at a time until the depth limit, the URL
//! limit, or an empty frontier stops it. Exactly one request is in flight at
//! a time and every processed URL is followed by the politeness delay.

use crate::config::Config;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::link_discovery::discover_from_page;
use crate::crawler::request::CrawlRequest;
use crate::robots::RobotsCache;
use crate::sitemap::SitemapDiscoverer;
use crate::state::CrawlState;
use crate::url::normalize_url;
use reqwest::Client;
use std::time::{Duration, Instant};

/// Default pause after each processed URL
pub const DEFAULT_POLITENESS_DELAY: Duration = Duration::from_millis(500);

/// Progress sink, called with `(crawled, discovered)` after each page
pub type ProgressCallback = Box<dyn Fn(usize, usize) + Send + Sync>;

/// Runs bounded breadth-first crawls of a single site
pub struct SiteCrawler {
    client: Client,
    robots_agent: String,
    politeness_delay: Duration,
    progress: Option<ProgressCallback>,
}

impl SiteCrawler {
    /// Creates a crawler
    ///
    /// `robots_agent` is the product token matched against robots.txt
    /// `User-agent` lines.
    pub fn new(client: Client, robots_agent: impl Into<String>) -> Self {
        Self {
            client,
            robots_agent: robots_agent.into(),
            politeness_delay: DEFAULT_POLITENESS_DELAY,
            progress: None,
        }
    }

    /// Creates a crawler with the HTTP client and delay the configuration describes
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.crawler.request_timeout_secs),
        )?;
        Ok(Self::new(client, config.user_agent.crawler_name.clone())
            .with_politeness_delay(Duration::from_millis(config.crawler.politeness_delay_ms)))
    }

    /// Sets the pause after each processed URL (zero disables it)
    pub fn with_politeness_delay(mut self, delay: Duration) -> Self {
        self.politeness_delay = delay;
        self
    }

    /// Registers a progress callback
    pub fn with_progress_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(usize, usize) + Send + Sync + 'static,
    {
        self.progress = Some(Box::new(callback));
        self
    }

    /// Crawls a site and returns up to `max_urls` discovered URLs
    ///
    /// Order is discovery order: the base URL, then sitemap URLs as
    /// declared, then links in the order the traversal found them.
    pub async fn crawl_site(&self, request: &CrawlRequest) -> Vec<String> {
        let limit = request.max_urls() as usize;
        self.run(request).await.into_results(limit)
    }

    /// Crawls a site and returns the final state of the run
    ///
    /// Nothing in here fails: unreachable pages, missing sitemaps and
    /// unreadable robots.txt files all just contribute fewer URLs.
    pub async fn run(&self, request: &CrawlRequest) -> CrawlState {
        let started = Instant::now();
        let max_urls = request.max_urls() as usize;
        let base_url = normalize_url(request.base_url(), request.base_url())
            .unwrap_or_else(|| request.base_url().to_string());

        tracing::info!(
            "Starting crawl of {} (max {} URLs, depth {}, robots {})",
            base_url,
            request.max_urls(),
            request.max_depth(),
            if request.respect_robots() { "respected" } else { "ignored" }
        );

        let mut state = CrawlState::new(RobotsCache::new(
            self.client.clone(),
            request.respect_robots(),
        ));

        let sitemap_urls = SitemapDiscoverer::new(self.client.clone())
            .discover(&base_url, state.robots_mut())
            .await;
        state.seed(&base_url, sitemap_urls);
        tracing::info!("Seeded with {} URL(s)", state.discovered_count());

        for depth in 1..=request.max_depth() {
            if state.crawled_count() >= max_urls || state.frontier().is_empty() {
                break;
            }

            let level = state.begin_level(depth);
            tracing::info!("Depth {}: {} URL(s) in frontier", depth, level.len());

            for url in level {
                if state.crawled_count() >= max_urls {
                    break;
                }
                if state.is_crawled(&url) {
                    continue;
                }

                let links =
                    discover_from_page(&self.client, state.robots_mut(), &url, &self.robots_agent)
                        .await;
                state.record_page(&url, links);

                if let Some(progress) = &self.progress {
                    progress(state.crawled_count(), state.discovered_count());
                }

                if !self.politeness_delay.is_zero() {
                    tokio::time::sleep(self.politeness_delay).await;
                }
            }

            state.end_level();
        }

        state.finish();
        tracing::info!(
            "Crawl of {} done in {:.1}s: {} page(s) crawled, {} URL(s) discovered, depth {}",
            base_url,
            started.elapsed().as_secs_f64(),
            state.crawled_count(),
            state.discovered_count(),
            state.depth_reached()
        );

        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn page(server: &MockServer, at: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(at))
            .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
            .mount(server)
            .await;
    }

    fn crawler() -> SiteCrawler {
        SiteCrawler::new(Client::new(), "TestBot").with_politeness_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_depth_limit() {
        let server = MockServer::start().await;
        page(&server, "/", r#"<a href="/a">a</a>"#).await;
        page(&server, "/a", r#"<a href="/b">b</a>"#).await;
        page(&server, "/b", r#"<a href="/c">c</a>"#).await;

        let base = format!("{}/", server.uri());
        let request = CrawlRequest::new(&base, 50, 2, false).unwrap();
        let state = crawler().run(&request).await;

        // Depth 1 crawls "/", depth 2 crawls "/a"; "/b" is discovered only
        assert_eq!(state.crawled_count(), 2);
        assert_eq!(state.depth_reached(), 2);
        assert!(state.discovered().contains(&format!("{}/b", server.uri())));
        assert!(!state.discovered().contains(&format!("{}/c", server.uri())));
        assert!(state.phase().is_done());
    }

    #[tokio::test]
    async fn test_stops_when_frontier_empty() {
        let server = MockServer::start().await;
        page(&server, "/", "<p>no links</p>").await;

        let request = CrawlRequest::new(&server.uri(), 50, 5, false).unwrap();
        let state = crawler().run(&request).await;
        assert_eq!(state.crawled_count(), 1);
        assert_eq!(state.depth_reached(), 1);
    }

    #[tokio::test]
    async fn test_progress_callback() {
        let server = MockServer::start().await;
        page(&server, "/", r#"<a href="/a">a</a><a href="/b">b</a>"#).await;

        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let crawler = crawler().with_progress_callback(move |crawled, discovered| {
            assert!(crawled <= discovered);
            seen.fetch_add(1, Ordering::SeqCst);
        });

        let request = CrawlRequest::new(&format!("{}/", server.uri()), 50, 2, false).unwrap();
        let urls = crawler.crawl_site(&request).await;

        assert_eq!(urls.len(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.crawler.politeness_delay_ms = 1200;
        config.user_agent.crawler_name = "AuditBot".to_string();

        let crawler = SiteCrawler::from_config(&config).unwrap();
        assert_eq!(crawler.politeness_delay, Duration::from_millis(1200));
        assert_eq!(crawler.robots_agent, "AuditBot");
    }

    #[tokio::test]
    async fn test_unreachable_site_returns_base_only() {
        let request = CrawlRequest::new("http://127.0.0.1:9/", 10, 3, true).unwrap();
        let urls = crawler().crawl_site(&request).await;
        assert_eq!(urls, vec!["http://127.0.0.1:9/"]);
    }
}

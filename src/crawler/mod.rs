//! Crawler module for site traversal and session orchestration
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with classified results
//! - HTML link extraction
//! - Single-page link discovery behind the robots check
//! - Bounded breadth-first traversal of one site
//! - Session coordination (crawl, analyze, persist)

mod coordinator;
mod fetcher;
mod link_discovery;
mod parser;
mod request;
mod site_crawler;

pub use coordinator::{Coordinator, SessionOutcome};
pub use fetcher::{build_http_client, fetch_url, user_agent_string, FetchResult, MAX_REDIRECTS};
pub use link_discovery::discover_from_page;
pub use parser::{extract_hrefs, extract_links};
pub use request::{clean_url, CrawlRequest, MAX_DEPTH_LIMIT, MAX_URLS_LIMIT};
pub use site_crawler::{ProgressCallback, SiteCrawler, DEFAULT_POLITENESS_DELAY};

//! Robots.txt handling module
//!
//! This module fetches, parses, and caches robots.txt files. Robots
//! failures never stop a crawl: anything other than a readable 200 response
//! becomes an allow-all policy.

mod cache;
mod parser;

pub use cache::{CachedPolicy, RobotsCache, RobotsVerdict, REASON_ALLOWED, REASON_BLOCKED, REASON_DISABLED};
pub use parser::ParsedRobots;

use crate::crawler::{fetch_url, FetchResult};
use reqwest::Client;

/// Location of robots.txt for an origin (`scheme://host[:port]`)
pub fn robots_url(origin: &str) -> String {
    format!("{}/robots.txt", origin.trim_end_matches('/'))
}

/// Fetches and parses robots.txt for an origin
///
/// | Response | Policy |
/// |----------|--------|
/// | HTTP 200 | parsed content |
/// | Other status | allow-all, "No robots.txt (HTTP N)" |
/// | Network error | allow-all, "Could not read robots.txt: ..." |
pub async fn fetch_robots(client: &Client, origin: &str) -> CachedPolicy {
    let url = robots_url(origin);
    tracing::debug!("Fetching {}", url);

    match fetch_url(client, &url).await {
        FetchResult::Success { body, .. } => CachedPolicy::parsed(ParsedRobots::from_content(&body)),
        FetchResult::HttpError { status_code } => {
            CachedPolicy::fallback(format!("No robots.txt (HTTP {})", status_code))
        }
        FetchResult::NetworkError { error } => {
            tracing::warn!("Could not read {}: {}", url, error);
            CachedPolicy::fallback(format!("Could not read robots.txt: {}", error))
        }
    }
}

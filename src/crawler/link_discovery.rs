//! Single-page link discovery

use crate::crawler::fetcher::{fetch_url, FetchResult};
use crate::crawler::parser::extract_links;
use crate::robots::RobotsCache;
use indexmap::IndexSet;
use reqwest::Client;

/// Fetches one page and returns its canonical same-domain links
///
/// Returns an empty set without fetching when robots.txt forbids the page,
/// and an empty set when the fetch fails or answers anything but 200.
/// Links are resolved against the requested URL, not the post-redirect one.
pub async fn discover_from_page(
    client: &Client,
    robots: &mut RobotsCache,
    url: &str,
    user_agent: &str,
) -> IndexSet<String> {
    let verdict = robots.allowed(url, user_agent).await;
    if !verdict.allowed {
        tracing::debug!("Skipping {}: {}", url, verdict.reason);
        return IndexSet::new();
    }

    match fetch_url(client, url).await {
        FetchResult::Success { body, .. } => {
            let links = extract_links(&body, url);
            tracing::debug!("Found {} same-domain link(s) on {}", links.len(), url);
            links
        }
        failed => {
            if let Some(reason) = failed.failure_reason() {
                tracing::debug!("No links from {}: {}", url, reason);
            }
            IndexSet::new()
        }
    }
}

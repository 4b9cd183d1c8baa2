//! Sitemap discovery module
//!
//! Looks for sitemaps at the well-known locations, falls back to the
//! `Sitemap:` lines of robots.txt, and expands sitemap indexes into the page
//! URLs they declare. Every failure here is swallowed: a site without usable
//! sitemaps simply contributes no URLs.

mod parser;

pub use parser::{parse_sitemap, parse_sitemap_lenient, scan_locs, SitemapDocument, SitemapError};

use crate::crawler::fetch_url;
use crate::robots::RobotsCache;
use crate::url::origin;
use indexmap::IndexSet;
use reqwest::Client;
use std::collections::{HashSet, VecDeque};

/// Well-known sitemap locations tried for every site, in order
pub const SITEMAP_PATHS: [&str; 2] = ["/sitemap.xml", "/sitemap_index.xml"];

/// Deepest level of sitemap-index nesting that is followed
pub const MAX_SITEMAP_DEPTH: usize = 5;

/// Collects the page URLs a site declares through its sitemaps
#[derive(Debug, Clone)]
pub struct SitemapDiscoverer {
    client: Client,
}

impl SitemapDiscoverer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Returns every page URL declared by the site's sitemaps
    ///
    /// URLs are returned as written in the sitemaps, in document order,
    /// without normalization. robots.txt is only consulted (through the
    /// shared cache) when neither well-known location answered 200.
    pub async fn discover(&self, base_url: &str, robots: &mut RobotsCache) -> IndexSet<String> {
        let mut urls = IndexSet::new();

        let Some(origin) = origin(base_url) else {
            tracing::warn!("Cannot derive origin of {}, skipping sitemaps", base_url);
            return urls;
        };

        let mut visited = HashSet::new();
        let well_known: Vec<String> = SITEMAP_PATHS
            .iter()
            .map(|path| format!("{}{}", origin, path))
            .collect();

        let found_direct = self.expand(well_known, &mut visited, &mut urls).await;

        if !found_direct {
            let declared = robots.policy(&origin).await.robots.sitemaps();
            if !declared.is_empty() {
                tracing::debug!("robots.txt declares {} sitemap(s)", declared.len());
                self.expand(declared, &mut visited, &mut urls).await;
            }
        }

        tracing::info!("Sitemap discovery for {} found {} URL(s)", origin, urls.len());
        urls
    }

    /// Fetches `roots` and every sitemap they reference, breadth-first
    ///
    /// Returns true if at least one root answered 200. Each sitemap URL is
    /// fetched at most once per discovery, and nesting deeper than
    /// [`MAX_SITEMAP_DEPTH`] is ignored.
    async fn expand(
        &self,
        roots: Vec<String>,
        visited: &mut HashSet<String>,
        urls: &mut IndexSet<String>,
    ) -> bool {
        let mut queue: VecDeque<(String, usize)> = roots
            .into_iter()
            .filter(|loc| visited.insert(loc.clone()))
            .map(|loc| (loc, 0))
            .collect();
        let mut root_found = false;

        while let Some((location, depth)) = queue.pop_front() {
            let Some(body) = self.fetch_sitemap(&location).await else {
                continue;
            };
            if depth == 0 {
                root_found = true;
            }

            let doc = parse_sitemap_lenient(&body);
            tracing::debug!(
                "Sitemap {} lists {} URL(s) and {} child sitemap(s)",
                location,
                doc.urls.len(),
                doc.sitemaps.len()
            );
            urls.extend(doc.urls);

            if depth >= MAX_SITEMAP_DEPTH {
                if !doc.sitemaps.is_empty() {
                    tracing::warn!("Sitemap nesting too deep at {}, not following children", location);
                }
                continue;
            }
            for child in doc.sitemaps {
                if visited.insert(child.clone()) {
                    queue.push_back((child, depth + 1));
                }
            }
        }

        root_found
    }

    async fn fetch_sitemap(&self, location: &str) -> Option<String> {
        let result = fetch_url(&self.client, location).await;
        if let Some(reason) = result.failure_reason() {
            tracing::debug!("No sitemap at {}: {}", location, reason);
        }
        result.into_body()
    }
}

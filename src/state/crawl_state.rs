//! Mutable state of one crawl run

use crate::robots::RobotsCache;
use crate::state::CrawlPhase;
use indexmap::IndexSet;

/// Everything one orchestrator run knows
///
/// Created fresh for every run and owned by it. `crawled` is always a
/// subset of `discovered`; both only ever grow.
#[derive(Debug)]
pub struct CrawlState {
    phase: CrawlPhase,
    discovered: IndexSet<String>,
    crawled: IndexSet<String>,
    frontier: IndexSet<String>,
    next_frontier: IndexSet<String>,
    depth_reached: u32,
    robots: RobotsCache,
}

impl CrawlState {
    /// Creates an empty state in the `Seeding` phase
    pub fn new(robots: RobotsCache) -> Self {
        Self {
            phase: CrawlPhase::Seeding,
            discovered: IndexSet::new(),
            crawled: IndexSet::new(),
            frontier: IndexSet::new(),
            next_frontier: IndexSet::new(),
            depth_reached: 0,
            robots,
        }
    }

    /// Records the base URL and sitemap URLs, and queues the base URL
    ///
    /// The base URL always comes first in discovery order.
    pub fn seed(&mut self, base_url: &str, sitemap_urls: impl IntoIterator<Item = String>) {
        self.discovered.insert(base_url.to_string());
        self.discovered.extend(sitemap_urls);
        self.frontier.clear();
        self.frontier.insert(base_url.to_string());
    }

    /// Enters `LevelProcessing` for `depth` and hands out the frontier
    ///
    /// The returned URLs are the ones to visit at this depth, in order.
    pub fn begin_level(&mut self, depth: u32) -> Vec<String> {
        self.phase = CrawlPhase::LevelProcessing { depth };
        self.depth_reached = depth;
        self.frontier.iter().cloned().collect()
    }

    /// Records a visited page and the links found on it
    ///
    /// Links land in `discovered`; those not yet crawled are queued for the
    /// next level.
    pub fn record_page(&mut self, url: &str, links: IndexSet<String>) {
        self.crawled.insert(url.to_string());
        for link in links {
            if !self.crawled.contains(&link) {
                self.next_frontier.insert(link.clone());
            }
            self.discovered.insert(link);
        }
    }

    /// Promotes the next frontier to be the current one
    pub fn end_level(&mut self) {
        self.frontier = std::mem::take(&mut self.next_frontier);
    }

    /// Moves to `Done`
    pub fn finish(&mut self) {
        self.phase = CrawlPhase::Done;
        self.frontier.clear();
        self.next_frontier.clear();
    }

    /// The first `limit` discovered URLs, in discovery order
    pub fn results(&self, limit: usize) -> Vec<String> {
        self.discovered.iter().take(limit).cloned().collect()
    }

    /// Consumes the state, returning the first `limit` discovered URLs
    pub fn into_results(self, limit: usize) -> Vec<String> {
        self.discovered.into_iter().take(limit).collect()
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn discovered(&self) -> &IndexSet<String> {
        &self.discovered
    }

    pub fn crawled(&self) -> &IndexSet<String> {
        &self.crawled
    }

    pub fn frontier(&self) -> &IndexSet<String> {
        &self.frontier
    }

    pub fn is_crawled(&self, url: &str) -> bool {
        self.crawled.contains(url)
    }

    pub fn crawled_count(&self) -> usize {
        self.crawled.len()
    }

    pub fn discovered_count(&self) -> usize {
        self.discovered.len()
    }

    /// Deepest BFS level entered so far
    pub fn depth_reached(&self) -> u32 {
        self.depth_reached
    }

    pub fn robots(&self) -> &RobotsCache {
        &self.robots
    }

    pub fn robots_mut(&mut self) -> &mut RobotsCache {
        &mut self.robots
    }

    /// Consumes the state, keeping only the robots cache for reuse
    pub fn into_robots(self) -> RobotsCache {
        self.robots
    }
}

//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: where a run is (seeding, processing a BFS level, done)
//! - `CrawlState`: discovered/crawled sets, frontiers and the run's robots cache

mod crawl_state;
mod phase;

// Re-export main types
pub use crawl_state::CrawlState;
pub use phase::CrawlPhase;

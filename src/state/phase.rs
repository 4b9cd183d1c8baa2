/// Crawl phase definitions
///
/// A run moves strictly forward: `Seeding`, then one `LevelProcessing` per
/// BFS depth, then `Done`.
use std::fmt;

/// Where a crawl run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Base URL and sitemap URLs are being collected
    Seeding,

    /// Pages of the given depth (1-based) are being fetched for links
    LevelProcessing { depth: u32 },

    /// Traversal finished; results are final
    Done,
}

impl CrawlPhase {
    /// Returns true once the run has finished
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// The BFS depth being processed, if any
    pub fn depth(&self) -> Option<u32> {
        match self {
            Self::LevelProcessing { depth } => Some(*depth),
            _ => None,
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seeding => write!(f, "seeding"),
            Self::LevelProcessing { depth } => write!(f, "level {}", depth),
            Self::Done => write!(f, "done"),
        }
    }
}

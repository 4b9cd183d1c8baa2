//! Storage module for persisting crawl sessions and results
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Session lifecycle tracking
//! - Per-URL analysis results

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use std::fmt;

/// A persisted crawl session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub id: i64,
    pub base_url: String,
    pub max_urls: u32,
    pub max_depth: u32,
    pub respect_robots: bool,
    pub status: SessionStatus,
    pub total_urls_found: u32,
    pub total_urls_analyzed: u32,
    pub issues_found: u32,
    pub started_at: String,
    pub completed_at: Option<String>,
    pub error_message: Option<String>,
    pub config_hash: String,
}

/// Lifecycle status of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl SessionStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_status_roundtrip() {
        for status in [
            SessionStatus::Pending,
            SessionStatus::Running,
            SessionStatus::Completed,
            SessionStatus::Failed,
        ] {
            assert_eq!(SessionStatus::from_db_string(status.to_db_string()), Some(status));
        }
        assert_eq!(SessionStatus::from_db_string("interrupted"), None);
    }
}

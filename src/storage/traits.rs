//! Storage traits and error types

use crate::analysis::CrawlResult;
use crate::crawler::CrawlRequest;
use crate::storage::SessionRecord;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Session not found: {0}")]
    SessionNotFound(i64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Sessions move `pending -> running -> completed | failed`; results are
/// append-only and belong to exactly one session.
pub trait Storage {
    // ===== Session Management =====

    /// Creates a `pending` session for a request
    ///
    /// # Returns
    ///
    /// The ID of the newly created session
    fn create_session(&mut self, request: &CrawlRequest, config_hash: &str) -> StorageResult<i64>;

    /// Gets a session by ID
    fn get_session(&self, session_id: i64) -> StorageResult<SessionRecord>;

    /// Lists all sessions, newest first
    fn list_sessions(&self) -> StorageResult<Vec<SessionRecord>>;

    /// Marks a session as running
    fn mark_running(&mut self, session_id: i64) -> StorageResult<()>;

    /// Marks a session as completed and records its totals
    fn complete_session(
        &mut self,
        session_id: i64,
        urls_found: u32,
        urls_analyzed: u32,
        issues_found: u32,
    ) -> StorageResult<()>;

    /// Marks a session as failed with an error message
    fn fail_session(&mut self, session_id: i64, message: &str) -> StorageResult<()>;

    /// Number of sessions stored
    fn count_sessions(&self) -> StorageResult<u64>;

    // ===== Results =====

    /// Appends the result for one URL
    ///
    /// # Returns
    ///
    /// The ID of the stored result row
    fn insert_result(&mut self, session_id: i64, result: &CrawlResult) -> StorageResult<i64>;

    /// All results of a session, in the order they were stored
    fn get_results(&self, session_id: i64) -> StorageResult<Vec<CrawlResult>>;
}

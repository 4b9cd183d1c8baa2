//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::analysis::{CrawlResult, PageSignals};
use crate::crawler::CrawlRequest;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{SessionRecord, SessionStatus};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::path::Path;

const SESSION_COLUMNS: &str = "id, base_url, max_urls, max_depth, respect_robots, status, \
     total_urls_found, total_urls_analyzed, issues_found, started_at, completed_at, \
     error_message, config_hash";

const RESULT_COLUMNS: &str = "url, title, meta_description, h1_tags, h2_tags, keywords, \
     word_count, load_time, mobile_friendly, images_without_alt, internal_links, \
     external_links, robots_txt_status, respect_robots, issues, error_message, analyzed_at";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (creating if needed) the database at `path`
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Runs an UPDATE on one session, failing if the session does not exist
    fn update_session(
        &mut self,
        session_id: i64,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> StorageResult<()> {
        let changed = self.conn.execute(sql, params)?;
        if changed == 0 {
            return Err(StorageError::SessionNotFound(session_id));
        }
        Ok(())
    }
}

fn session_from_row(row: &Row<'_>) -> rusqlite::Result<SessionRecord> {
    Ok(SessionRecord {
        id: row.get(0)?,
        base_url: row.get(1)?,
        max_urls: row.get(2)?,
        max_depth: row.get(3)?,
        respect_robots: row.get(4)?,
        status: SessionStatus::from_db_string(&row.get::<_, String>(5)?)
            .unwrap_or(SessionStatus::Failed),
        total_urls_found: row.get(6)?,
        total_urls_analyzed: row.get(7)?,
        issues_found: row.get(8)?,
        started_at: row.get(9)?,
        completed_at: row.get(10)?,
        error_message: row.get(11)?,
        config_hash: row.get(12)?,
    })
}

/// A `crawl_results` row before its JSON columns are decoded
struct ResultRow {
    url: String,
    title: Option<String>,
    meta_description: Option<String>,
    h1_tags: String,
    h2_tags: String,
    keywords: String,
    word_count: Option<u32>,
    load_time: Option<f64>,
    mobile_friendly: Option<bool>,
    images_without_alt: String,
    internal_links: Option<u32>,
    external_links: Option<u32>,
    robots_txt_status: Option<String>,
    respect_robots: Option<bool>,
    issues: String,
    error_message: Option<String>,
    analyzed_at: String,
}

impl ResultRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            url: row.get(0)?,
            title: row.get(1)?,
            meta_description: row.get(2)?,
            h1_tags: row.get(3)?,
            h2_tags: row.get(4)?,
            keywords: row.get(5)?,
            word_count: row.get(6)?,
            load_time: row.get(7)?,
            mobile_friendly: row.get(8)?,
            images_without_alt: row.get(9)?,
            internal_links: row.get(10)?,
            external_links: row.get(11)?,
            robots_txt_status: row.get(12)?,
            respect_robots: row.get(13)?,
            issues: row.get(14)?,
            error_message: row.get(15)?,
            analyzed_at: row.get(16)?,
        })
    }

    fn into_result(self) -> StorageResult<CrawlResult> {
        let analyzed_at = DateTime::parse_from_rfc3339(&self.analyzed_at)
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());
        let issues: Vec<String> = serde_json::from_str(&self.issues)?;

        let signals = if self.error_message.is_none() {
            Some(PageSignals {
                url: self.url.clone(),
                title: self.title,
                meta_description: self.meta_description,
                h1_tags: serde_json::from_str(&self.h1_tags)?,
                h2_tags: serde_json::from_str(&self.h2_tags)?,
                keywords: serde_json::from_str(&self.keywords)?,
                word_count: self.word_count.unwrap_or(0),
                load_time: self.load_time.unwrap_or(0.0),
                mobile_friendly: self.mobile_friendly.unwrap_or(false),
                images_without_alt: serde_json::from_str(&self.images_without_alt)?,
                internal_links: self.internal_links.unwrap_or(0),
                external_links: self.external_links.unwrap_or(0),
                robots_txt_status: self.robots_txt_status.unwrap_or_default(),
                respect_robots: self.respect_robots.unwrap_or(true),
            })
        } else {
            None
        };

        Ok(CrawlResult {
            url: self.url,
            signals,
            error: self.error_message,
            issues,
            analyzed_at,
        })
    }
}

impl Storage for SqliteStorage {
    // ===== Session Management =====

    fn create_session(&mut self, request: &CrawlRequest, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO crawl_sessions (base_url, max_urls, max_depth, respect_robots, status, started_at, config_hash)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                request.base_url(),
                request.max_urls(),
                request.max_depth(),
                request.respect_robots(),
                SessionStatus::Pending.to_db_string(),
                now,
                config_hash
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_session(&self, session_id: i64) -> StorageResult<SessionRecord> {
        let sql = format!("SELECT {} FROM crawl_sessions WHERE id = ?1", SESSION_COLUMNS);
        self.conn
            .query_row(&sql, params![session_id], session_from_row)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StorageError::SessionNotFound(session_id),
                other => StorageError::Sqlite(other),
            })
    }

    fn list_sessions(&self) -> StorageResult<Vec<SessionRecord>> {
        let sql = format!("SELECT {} FROM crawl_sessions ORDER BY id DESC", SESSION_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let sessions = stmt
            .query_map([], session_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sessions)
    }

    fn mark_running(&mut self, session_id: i64) -> StorageResult<()> {
        self.update_session(
            session_id,
            "UPDATE crawl_sessions SET status = ?1 WHERE id = ?2",
            params![SessionStatus::Running.to_db_string(), session_id],
        )
    }

    fn complete_session(
        &mut self,
        session_id: i64,
        urls_found: u32,
        urls_analyzed: u32,
        issues_found: u32,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.update_session(
            session_id,
            "UPDATE crawl_sessions
             SET status = ?1, total_urls_found = ?2, total_urls_analyzed = ?3,
                 issues_found = ?4, completed_at = ?5
             WHERE id = ?6",
            params![
                SessionStatus::Completed.to_db_string(),
                urls_found,
                urls_analyzed,
                issues_found,
                now,
                session_id
            ],
        )
    }

    fn fail_session(&mut self, session_id: i64, message: &str) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.update_session(
            session_id,
            "UPDATE crawl_sessions SET status = ?1, error_message = ?2, completed_at = ?3 WHERE id = ?4",
            params![SessionStatus::Failed.to_db_string(), message, now, session_id],
        )
    }

    fn count_sessions(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM crawl_sessions", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    // ===== Results =====

    fn insert_result(&mut self, session_id: i64, result: &CrawlResult) -> StorageResult<i64> {
        let issues = serde_json::to_string(&result.issues)?;
        let analyzed_at = result.analyzed_at.to_rfc3339();

        match &result.signals {
            Some(s) => {
                self.conn.execute(
                    "INSERT INTO crawl_results (session_id, url, title, meta_description, h1_tags, h2_tags,
                         keywords, word_count, load_time, mobile_friendly, images_without_alt,
                         internal_links, external_links, robots_txt_status, respect_robots,
                         issues, issue_count, error_message, analyzed_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
                    params![
                        session_id,
                        result.url,
                        s.title,
                        s.meta_description,
                        serde_json::to_string(&s.h1_tags)?,
                        serde_json::to_string(&s.h2_tags)?,
                        serde_json::to_string(&s.keywords)?,
                        s.word_count,
                        s.load_time,
                        s.mobile_friendly,
                        serde_json::to_string(&s.images_without_alt)?,
                        s.internal_links,
                        s.external_links,
                        s.robots_txt_status,
                        s.respect_robots,
                        issues,
                        result.issues.len() as u32,
                        result.error,
                        analyzed_at
                    ],
                )?;
            }
            None => {
                self.conn.execute(
                    "INSERT INTO crawl_results (session_id, url, issues, issue_count, error_message, analyzed_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        session_id,
                        result.url,
                        issues,
                        result.issues.len() as u32,
                        result.error.as_deref().unwrap_or("Unknown error"),
                        analyzed_at
                    ],
                )?;
            }
        }

        Ok(self.conn.last_insert_rowid())
    }

    fn get_results(&self, session_id: i64) -> StorageResult<Vec<CrawlResult>> {
        let sql = format!(
            "SELECT {} FROM crawl_results WHERE session_id = ?1 ORDER BY id",
            RESULT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![session_id], ResultRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(ResultRow::into_result).collect()
    }
}

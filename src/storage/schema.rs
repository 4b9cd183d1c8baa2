//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the SEO Sweep database.

/// SQL schema for the database
///
/// List-valued page signals (headings, keywords, images, issues) are stored
/// as JSON arrays.
pub const SCHEMA_SQL: &str = r#"
-- One row per crawl + analysis job
CREATE TABLE IF NOT EXISTS crawl_sessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    base_url TEXT NOT NULL,
    max_urls INTEGER NOT NULL,
    max_depth INTEGER NOT NULL,
    respect_robots INTEGER NOT NULL,
    status TEXT NOT NULL,
    total_urls_found INTEGER NOT NULL DEFAULT 0,
    total_urls_analyzed INTEGER NOT NULL DEFAULT 0,
    issues_found INTEGER NOT NULL DEFAULT 0,
    started_at TEXT NOT NULL,
    completed_at TEXT,
    error_message TEXT,
    config_hash TEXT NOT NULL
);

-- One row per analyzed URL
CREATE TABLE IF NOT EXISTS crawl_results (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id INTEGER NOT NULL REFERENCES crawl_sessions(id),
    url TEXT NOT NULL,
    title TEXT,
    meta_description TEXT,
    h1_tags TEXT NOT NULL DEFAULT '[]',
    h2_tags TEXT NOT NULL DEFAULT '[]',
    keywords TEXT NOT NULL DEFAULT '[]',
    word_count INTEGER,
    load_time REAL,
    mobile_friendly INTEGER,
    images_without_alt TEXT NOT NULL DEFAULT '[]',
    internal_links INTEGER,
    external_links INTEGER,
    robots_txt_status TEXT,
    respect_robots INTEGER,
    issues TEXT NOT NULL DEFAULT '[]',
    issue_count INTEGER NOT NULL DEFAULT 0,
    error_message TEXT,
    analyzed_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_crawl_results_session ON crawl_results(session_id);
CREATE INDEX IF NOT EXISTS idx_crawl_sessions_status ON crawl_sessions(status);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

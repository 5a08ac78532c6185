//! `SQLite` schema for the session store.

/// Key/value rows backing the session (`access`, `refresh`, `user`).
pub const CREATE_SESSION_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS session_entries (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// Store-level bookkeeping such as the schema version.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_SESSION_TABLE, CREATE_METADATA_TABLE];

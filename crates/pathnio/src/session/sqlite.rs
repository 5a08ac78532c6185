//! Durable session store backed by `SQLite`.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::{migrations, SessionStore};
use crate::error::{Error, Result};

/// Session store persisted in a small `SQLite` database.
///
/// This is the CLI's counterpart of browser storage: credentials written by
/// `pathnio login` survive across invocations until logout or a 401.
#[derive(Debug)]
pub struct SqliteStore {
    path: PathBuf,
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a session database at the given path.
    ///
    /// Parent directories are created as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening session store at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::StoreOpen {
            path: path.clone(),
            source,
        })?;
        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::StoreOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Mutex::new(conn),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the given key was last written, if it is present.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn updated_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let raw: Option<String> = self
            .lock()?
            .query_row(
                "SELECT updated_at FROM session_entries WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;

        Ok(raw
            .and_then(|s| NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S").ok())
            .map(|naive| naive.and_utc()))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::internal("session store lock poisoned"))
    }
}

impl SessionStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .lock()?
            .query_row(
                "SELECT value FROM session_entries WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.execute(
            r"
            INSERT INTO session_entries (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?
            .execute("DELETE FROM session_entries WHERE key = ?1", [key])?;
        Ok(())
    }

    fn remove_all(&self, keys: &[&str]) -> Result<()> {
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction()?;
        for key in keys {
            tx.execute("DELETE FROM session_entries WHERE key = ?1", [*key])?;
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = SqliteStore::open_in_memory().unwrap();

        assert_eq!(store.get("access").unwrap(), None);
        store.set("access", "abc123").unwrap();
        assert_eq!(store.get("access").unwrap().as_deref(), Some("abc123"));

        store.remove("access").unwrap();
        assert_eq!(store.get("access").unwrap(), None);
    }

    #[test]
    fn test_set_overwrites() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set("access", "old").unwrap();
        store.set("access", "new").unwrap();

        assert_eq!(store.get("access").unwrap().as_deref(), Some("new"));
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.remove("refresh").is_ok());
    }

    #[test]
    fn test_remove_all() {
        let store = SqliteStore::open_in_memory().unwrap();
        for key in ["access", "refresh", "user", "other"] {
            store.set(key, "x").unwrap();
        }

        store.remove_all(&["access", "refresh", "user"]).unwrap();
        for key in ["access", "refresh", "user"] {
            assert!(store.get(key).unwrap().is_none(), "{key}");
        }
        assert_eq!(store.get("other").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_updated_at() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.updated_at("access").unwrap().is_none());

        store.set("access", "abc123").unwrap();
        let stamp = store.updated_at("access").unwrap().expect("timestamp");
        assert!(Utc::now().signed_duration_since(stamp).num_minutes() < 5);
    }

    #[test]
    fn test_in_memory_path() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.path(), Path::new(":memory:"));
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = std::env::temp_dir().join(format!(
            "pathnio-session-test-{}-{}",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let path = dir.join("nested").join("session.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.set("refresh", "r-token").unwrap();
        }
        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(reopened.get("refresh").unwrap().as_deref(), Some("r-token"));

        drop(reopened);
        let _ = std::fs::remove_dir_all(&dir);
    }
}

//! Session context for the API client.
//!
//! Credentials live in a [`SessionStore`] owned by a single [`Session`], which
//! is handed to the client explicitly. Nothing here is global: a test can
//! run several independent sessions side by side.

pub mod migrations;
pub mod schema;
mod sqlite;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{TokenPair, User};

pub use sqlite::SqliteStore;

/// Storage key for the access token.
pub const ACCESS_KEY: &str = "access";

/// Storage key for the refresh token.
pub const REFRESH_KEY: &str = "refresh";

/// Storage key for the cached user profile (JSON).
pub const USER_KEY: &str = "user";

/// Every key that belongs to a session.
pub const SESSION_KEYS: [&str; 3] = [ACCESS_KEY, REFRESH_KEY, USER_KEY];

/// A persistent string key/value store.
pub trait SessionStore: Send + Sync + std::fmt::Debug {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<()>;

    /// Delete several values. Every key is attempted even when one fails.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered.
    fn remove_all(&self, keys: &[&str]) -> Result<()> {
        let mut first = None;
        for key in keys {
            if let Err(e) = self.remove(key) {
                first.get_or_insert(e);
            }
        }
        first.map_or(Ok(()), Err)
    }
}

/// In-process store; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| Error::internal("memory store lock poisoned"))
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}

/// Whether the session currently holds credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// An access token is stored.
    Authenticated,
    /// No access token is stored.
    Anonymous,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Authenticated => write!(f, "authenticated"),
            Self::Anonymous => write!(f, "anonymous"),
        }
    }
}

/// Typed view over a [`SessionStore`].
///
/// Cloning is cheap and every clone sees the same store.
#[derive(Debug, Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl Session {
    /// Wrap a store.
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// A session over a fresh [`MemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// The stored access token, if any. Empty strings count as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn access_token(&self) -> Result<Option<String>> {
        Ok(self.store.get(ACCESS_KEY)?.filter(|t| !t.is_empty()))
    }

    /// The stored refresh token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn refresh_token(&self) -> Result<Option<String>> {
        Ok(self.store.get(REFRESH_KEY)?.filter(|t| !t.is_empty()))
    }

    /// The cached user profile.
    ///
    /// A cached value that no longer parses is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn user(&self) -> Result<Option<User>> {
        let Some(raw) = self.store.get(USER_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                debug!("Ignoring unreadable cached user: {e}");
                Ok(None)
            }
        }
    }

    /// Persist a freshly issued token pair.
    ///
    /// A pair without a refresh token removes any stale one.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn store_tokens(&self, tokens: &TokenPair) -> Result<()> {
        self.store.set(ACCESS_KEY, &tokens.access)?;
        match &tokens.refresh {
            Some(refresh) => self.store.set(REFRESH_KEY, refresh)?,
            None => self.store.remove(REFRESH_KEY)?,
        }
        debug!("Stored session tokens");
        Ok(())
    }

    /// Cache the current user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn store_user(&self, user: &User) -> Result<()> {
        self.store.set(USER_KEY, &serde_json::to_string(user)?)?;
        debug!(user_id = user.id, "Cached user profile");
        Ok(())
    }

    /// Remove every session key.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn clear(&self) -> Result<()> {
        self.store.remove_all(&SESSION_KEYS)?;
        debug!("Cleared session");
        Ok(())
    }

    /// Current state of the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn state(&self) -> Result<SessionState> {
        Ok(if self.access_token()?.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        serde_json::from_value(serde_json::json!({
            "id": 7,
            "username": "fleetmgr",
            "email": "mgr@example.com",
            "company_name": "Demo Co."
        }))
        .unwrap()
    }

    /// Fails every removal of one key, like a store with a bad row.
    #[derive(Debug)]
    struct StubbornStore {
        inner: MemoryStore,
        stuck: &'static str,
    }

    impl SessionStore for StubbornStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<()> {
            if key == self.stuck {
                return Err(Error::internal(format!("cannot remove {key}")));
            }
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_clear_attempts_every_key() {
        let store = Arc::new(StubbornStore {
            inner: MemoryStore::new(),
            stuck: ACCESS_KEY,
        });
        let session = Session::new(store.clone());
        session
            .store_tokens(&TokenPair::new("abc123", Some("r-1".to_string())))
            .unwrap();
        session.store_user(&sample_user()).unwrap();

        let err = session.clear().unwrap_err();
        assert!(err.to_string().contains("cannot remove access"));
        assert!(store.get(REFRESH_KEY).unwrap().is_none());
        assert!(store.get(USER_KEY).unwrap().is_none());
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert!(store.get("k").unwrap().is_none());
    }

    #[test]
    fn test_fresh_session_is_anonymous() {
        let session = Session::in_memory();
        assert_eq!(session.state().unwrap(), SessionState::Anonymous);
        assert!(session.access_token().unwrap().is_none());
        assert!(session.user().unwrap().is_none());
    }

    #[test]
    fn test_store_tokens_authenticates() {
        let session = Session::in_memory();
        session
            .store_tokens(&TokenPair::new("abc123", Some("r-1".to_string())))
            .unwrap();

        assert_eq!(session.state().unwrap(), SessionState::Authenticated);
        assert_eq!(session.access_token().unwrap().as_deref(), Some("abc123"));
        assert_eq!(session.refresh_token().unwrap().as_deref(), Some("r-1"));
    }

    #[test]
    fn test_token_without_refresh_drops_stale_refresh() {
        let session = Session::in_memory();
        session.store().set(REFRESH_KEY, "stale").unwrap();
        session.store_tokens(&TokenPair::new("abc", None)).unwrap();

        assert!(session.refresh_token().unwrap().is_none());
    }

    #[test]
    fn test_empty_access_token_is_anonymous() {
        let session = Session::in_memory();
        session.store().set(ACCESS_KEY, "").unwrap();
        assert_eq!(session.state().unwrap(), SessionState::Anonymous);
    }

    #[test]
    fn test_store_and_read_user() {
        let session = Session::in_memory();
        session.store_user(&sample_user()).unwrap();

        let user = session.user().unwrap().expect("cached user");
        assert_eq!(user.id, 7);
        assert_eq!(user.company_name.as_deref(), Some("Demo Co."));
    }

    #[test]
    fn test_unreadable_user_is_absent() {
        let session = Session::in_memory();
        session.store().set(USER_KEY, "{not json").unwrap();
        assert!(session.user().unwrap().is_none());
    }

    #[test]
    fn test_clear_removes_all_keys() {
        let session = Session::in_memory();
        session
            .store_tokens(&TokenPair::new("abc123", Some("r".to_string())))
            .unwrap();
        session.store_user(&sample_user()).unwrap();
        session.store().set("theme", "dark").unwrap();

        session.clear().unwrap();

        for key in SESSION_KEYS {
            assert!(session.store().get(key).unwrap().is_none(), "{key} left");
        }
        // Non-session keys are not ours to remove
        assert_eq!(session.store().get("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(session.state().unwrap(), SessionState::Anonymous);
    }

    #[test]
    fn test_clones_share_store() {
        let a = Session::in_memory();
        let b = a.clone();
        a.store_tokens(&TokenPair::new("shared", None)).unwrap();
        assert_eq!(b.access_token().unwrap().as_deref(), Some("shared"));
    }

    #[test]
    fn test_session_over_sqlite_store() {
        let session = Session::new(Arc::new(SqliteStore::open_in_memory().unwrap()));
        session.store_tokens(&TokenPair::new("abc123", None)).unwrap();
        assert_eq!(session.state().unwrap(), SessionState::Authenticated);
        session.clear().unwrap();
        assert_eq!(session.state().unwrap(), SessionState::Anonymous);
    }

    #[test]
    fn test_session_state_display() {
        assert_eq!(SessionState::Authenticated.to_string(), "authenticated");
        assert_eq!(SessionState::Anonymous.to_string(), "anonymous");
    }
}

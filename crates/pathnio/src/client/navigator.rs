//! Where the client sends the operator after a forced logout.

use std::sync::{Mutex, PoisonError};

use tracing::warn;

/// Receives the login location when the backend ends the session.
pub trait Navigator: Send + Sync + std::fmt::Debug {
    /// Move the operator to `location`.
    fn navigate(&self, location: &str);
}

/// Tells the operator, through the log, to sign in again.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, location: &str) {
        warn!(location, "Session ended by the server; run `pathnio login` to sign in again");
    }
}

/// Records every location it is sent to.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    /// Create a navigator with no history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every location visited, oldest first.
    #[must_use]
    pub fn visited(&self) -> Vec<String> {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent location.
    #[must_use]
    pub fn current(&self) -> Option<String> {
        self.visited().pop()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, location: &str) {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(location.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_navigator() {
        let nav = RecordingNavigator::new();
        assert!(nav.current().is_none());

        nav.navigate("/login");
        nav.navigate("/dashboard");
        assert_eq!(nav.visited(), vec!["/login", "/dashboard"]);
        assert_eq!(nav.current().as_deref(), Some("/dashboard"));
    }

    #[test]
    fn test_log_navigator_does_not_panic() {
        crate::logging::init_test_logging();
        LogNavigator.navigate("/login");
    }
}

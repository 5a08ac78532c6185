//! Error types for pathnio.
//!
//! This module defines all error types used throughout the pathnio crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// The main error type for pathnio operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Session Errors ===
    /// The backend rejected the credentials; the local session has been cleared.
    #[error("session expired or unauthorized; please log in again")]
    Unauthorized,

    /// An operation needs credentials but none are stored.
    #[error("not logged in")]
    NotLoggedIn,

    // === HTTP Errors ===
    /// The backend answered with a non-success status other than 401.
    #[error("request failed with status {status}{}", detail_suffix(.detail.as_deref()))]
    Http {
        /// The response status.
        status: StatusCode,
        /// The `detail` message from the response body, if any.
        detail: Option<String>,
        /// The raw response body.
        body: String,
    },

    /// The request could not be sent or its response could not be read.
    #[error("HTTP transport error: {0}")]
    Request(#[from] reqwest::Error),

    /// The configured backend origin is not a usable URL.
    #[error("invalid base URL '{url}': {message}")]
    InvalidBaseUrl {
        /// The offending URL.
        url: String,
        /// Description of what went wrong.
        message: String,
    },

    // === Session Store Errors ===
    /// Failed to open or create the session database.
    #[error("failed to open session store at {path}: {source}")]
    StoreOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A session store query failed.
    #[error("session store query failed: {0}")]
    StoreQuery(#[from] rusqlite::Error),

    /// Failed to run session store migrations.
    #[error("session store migration failed: {message}")]
    StoreMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

fn detail_suffix(detail: Option<&str>) -> String {
    detail.map(|d| format!(": {d}")).unwrap_or_default()
}

/// A specialized Result type for pathnio operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Build an HTTP status error from a response body.
    ///
    /// The `detail` field of a JSON body is lifted out when present, matching
    /// how the backend reports most failures.
    #[must_use]
    pub fn http(status: StatusCode, body: String) -> Self {
        let detail = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_owned));
        Self::Http {
            status,
            detail,
            body,
        }
    }

    /// Check if this error is the forced-logout signal.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// The HTTP status carried by this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            Self::Http { status, .. } => Some(*status),
            Self::Request(err) => err.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Unauthorized;
        assert_eq!(
            err.to_string(),
            "session expired or unauthorized; please log in again"
        );

        let err = Error::NotLoggedIn;
        assert_eq!(err.to_string(), "not logged in");
    }

    #[test]
    fn test_http_error_lifts_detail() {
        let err = Error::http(
            StatusCode::FORBIDDEN,
            r#"{"detail": "You do not have permission."}"#.to_string(),
        );
        match &err {
            Error::Http { detail, .. } => {
                assert_eq!(detail.as_deref(), Some("You do not have permission."));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "request failed with status 403 Forbidden: You do not have permission."
        );
    }

    #[test]
    fn test_http_error_without_detail() {
        let err = Error::http(StatusCode::BAD_GATEWAY, "<html>oops</html>".to_string());
        assert_eq!(err.to_string(), "request failed with status 502 Bad Gateway");
        assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
    }

    #[test]
    fn test_is_unauthorized() {
        assert!(Error::Unauthorized.is_unauthorized());
        assert!(!Error::NotLoggedIn.is_unauthorized());
        assert_eq!(Error::Unauthorized.status(), Some(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn test_invalid_base_url_display() {
        let err = Error::InvalidBaseUrl {
            url: "ftp://x".to_string(),
            message: "unsupported scheme".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("ftp://x"));
        assert!(msg.contains("unsupported scheme"));
    }

    #[test]
    fn test_internal_error() {
        let err = Error::internal("something went wrong");
        assert_eq!(err.to_string(), "internal error: something went wrong");
        assert!(err.status().is_none());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/session.db",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::StoreQuery(_)));
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "timeout_secs must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }

    #[test]
    fn test_store_migration_error_display() {
        let err = Error::StoreMigration {
            message: "version mismatch".to_string(),
        };
        assert!(err.to_string().contains("version mismatch"));
    }
}

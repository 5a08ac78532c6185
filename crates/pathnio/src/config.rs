//! Configuration management for pathnio.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "pathnio";

/// Default session database file name.
const SESSION_FILE_NAME: &str = "session.db";

/// Backend origin used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Plain deployment variable that carries the backend origin.
const BASE_URL_ENV: &str = "API_BASE_URL";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `PATHNIO_`, nested with `__`)
/// 2. The `API_BASE_URL` environment variable (for `api.base_url` only)
/// 3. TOML config file at `~/.config/pathnio/config.toml`
/// 4. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend API configuration.
    pub api: ApiConfig,
    /// Session persistence configuration.
    pub session: SessionConfig,
    /// CLI output configuration.
    pub output: OutputConfig,
}

/// Backend API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Backend origin; the client appends `/api/` to it.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
}

/// Session persistence configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Path to the session database.
    /// Defaults to `~/.local/share/pathnio/session.db`
    pub store_path: Option<PathBuf>,
    /// Location the client navigates to when the backend answers 401.
    pub login_path: String,
}

/// CLI output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format (`plain`, `table` or `json`).
    pub format: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            user_agent: concat!("pathnio/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            store_path: None, // Resolved to the data dir at runtime
            login_path: "/login".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "table".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(
                Env::raw()
                    .only(&[BASE_URL_ENV])
                    .map(|_| "api.base_url".into()),
            )
            .merge(Env::prefixed("PATHNIO_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(self.api.base_url.trim()).map_err(|e| {
            Error::ConfigValidation {
                message: format!("api.base_url '{}' is not a URL: {e}", self.api.base_url),
            }
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::ConfigValidation {
                message: format!("api.base_url must be http or https, got '{}'", url.scheme()),
            });
        }

        if self.api.timeout_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "api.timeout_secs must be greater than 0".to_string(),
            });
        }

        if !self.session.login_path.starts_with('/') {
            return Err(Error::ConfigValidation {
                message: format!(
                    "session.login_path must start with '/', got '{}'",
                    self.session.login_path
                ),
            });
        }

        if !matches!(self.output.format.as_str(), "plain" | "table" | "json") {
            return Err(Error::ConfigValidation {
                message: format!("unknown output.format '{}'", self.output.format),
            });
        }

        Ok(())
    }

    /// Get the session database path, resolving defaults if not set.
    #[must_use]
    pub fn session_store_path(&self) -> PathBuf {
        self.session
            .store_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(SESSION_FILE_NAME))
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.timeout_secs, 30);
        assert!(config.api.user_agent.starts_with("pathnio/"));
        assert_eq!(config.session.login_path, "/login");
        assert_eq!(config.output.format, "table");
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_url() {
        let mut config = Config::default();
        config.api.base_url = "not a url".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("api.base_url"));
    }

    #[test]
    fn test_validate_rejects_non_http_scheme() {
        let mut config = Config::default();
        config.api.base_url = "ftp://files.example.com".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("http or https"));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.api.timeout_secs = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("timeout_secs"));
    }

    #[test]
    fn test_validate_relative_login_path() {
        let mut config = Config::default();
        config.session.login_path = "login".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("login_path"));
    }

    #[test]
    fn test_validate_unknown_output_format() {
        let mut config = Config::default();
        config.output.format = "xml".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_session_store_path_default() {
        let config = Config::default();
        let path = config.session_store_path();

        assert!(path.to_string_lossy().contains("session.db"));
        assert!(path.to_string_lossy().contains("pathnio"));
    }

    #[test]
    fn test_session_store_path_custom() {
        let mut config = Config::default();
        config.session.store_path = Some(PathBuf::from("/custom/session.sqlite"));

        assert_eq!(
            config.session_store_path(),
            PathBuf::from("/custom/session.sqlite")
        );
    }

    #[test]
    fn test_timeout() {
        let config = Config::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("pathnio"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        figment::Jail::expect_with(|_| {
            let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    const SECTIONS_TOML: &str = r#"
[api]
base_url = "https://file.example.com"
timeout_secs = 5

[session]
login_path = "/signin"

[output]
format = "json"
"#;

    fn load_in(jail: &figment::Jail) -> figment::error::Result<Config> {
        let path = jail.directory().join(CONFIG_FILE_NAME);
        Config::load_from(Some(path)).map_err(|e| e.to_string().into())
    }

    #[test]
    fn test_load_toml_sections() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE_NAME, SECTIONS_TOML)?;

            let config = load_in(jail)?;
            assert_eq!(config.api.base_url, "https://file.example.com");
            assert_eq!(config.api.timeout_secs, 5);
            assert_eq!(config.session.login_path, "/signin");
            assert_eq!(config.output.format, "json");
            Ok(())
        });
    }

    #[test]
    fn test_api_base_url_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE_NAME, SECTIONS_TOML)?;
            jail.set_env("API_BASE_URL", "https://example.com/");

            let config = load_in(jail)?;
            assert_eq!(config.api.base_url, "https://example.com/");
            // Other file values are kept
            assert_eq!(config.api.timeout_secs, 5);

            let base = crate::client::ApiBase::new(&config.api.base_url)
                .map_err(|e| e.to_string())?;
            assert_eq!(base.prefix().as_str(), "https://example.com/api/");
            Ok(())
        });
    }

    #[test]
    fn test_prefixed_env_overrides_api_base_url() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE_NAME, SECTIONS_TOML)?;
            jail.set_env("API_BASE_URL", "https://deploy.example.com");
            jail.set_env("PATHNIO_API__BASE_URL", "https://override.example.com");
            jail.set_env("PATHNIO_SESSION__LOGIN_PATH", "/auth/login");

            let config = load_in(jail)?;
            assert_eq!(config.api.base_url, "https://override.example.com");
            assert_eq!(config.session.login_path, "/auth/login");
            assert_eq!(config.output.format, "json");
            Ok(())
        });
    }

    #[test]
    fn test_env_without_file() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("API_BASE_URL", "https://fleet.example.com");

            let config = load_in(jail)?;
            assert_eq!(config.api.base_url, "https://fleet.example.com");
            assert_eq!(config.api.timeout_secs, 30);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_env_base_url_fails_validation() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("API_BASE_URL", "ftp://example.com");

            let path = jail.directory().join(CONFIG_FILE_NAME);
            let err = Config::load_from(Some(path)).unwrap_err();
            assert!(matches!(err, Error::ConfigValidation { .. }));
            Ok(())
        });
    }

    #[test]
    fn test_api_config_deserialize_partial() {
        let json = r#"{"base_url": "https://fleet.example.com/"}"#;
        let api: ApiConfig = serde_json::from_str(json).unwrap();
        assert_eq!(api.base_url, "https://fleet.example.com/");
        assert_eq!(api.timeout_secs, 30);
    }

    #[test]
    fn test_session_config_serialize() {
        let session = SessionConfig::default();
        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains("login_path"));
        assert!(json.contains("store_path"));
    }
}

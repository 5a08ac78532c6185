//! `pathnio` - Authenticated client for the Pathnio fleet-management API
//!
//! This library provides the session store, the bearer-authenticated HTTP
//! client, typed endpoint calls, and the derived views used by the `pathnio`
//! command-line tool.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use pathnio::{api, ApiClient, Config, LogNavigator, Session};
//!
//! # async fn run() -> pathnio::Result<()> {
//! let config = Config::load()?;
//! let client = ApiClient::from_config(&config, Session::in_memory(), Arc::new(LogNavigator))?;
//! let profile = api::profile::fetch(&client).await?;
//! println!("{}", profile.full_name);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod session;
pub mod stats;

pub use client::{ApiBase, ApiClient, LogNavigator, Navigator, RecordingNavigator};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use session::{MemoryStore, Session, SessionState, SessionStore, SqliteStore};

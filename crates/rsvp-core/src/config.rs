//! Client configuration
//!
//! Resolved from environment variables, with CLI flags layered on top by the
//! caller:
//!
//! | Variable | Default |
//! |---|---|
//! | `RSVP_API_URL` | `http://localhost:3000` |
//! | `RSVP_DB_PATH` | `<data dir>/rsvp.db` |
//! | `RSVP_HTTP_TIMEOUT_SECS` | `30` |

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

pub const API_URL_ENV: &str = "RSVP_API_URL";
pub const DB_PATH_ENV: &str = "RSVP_DB_PATH";
pub const TIMEOUT_ENV: &str = "RSVP_HTTP_TIMEOUT_SECS";

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings needed to build a session against a running auth service
#[derive(Debug, Clone, PartialEq)]
pub struct AuthConfig {
    /// Base URL the `/api/auth/*` paths are joined onto
    pub base_url: String,
    /// SQLite file backing client storage
    pub db_path: PathBuf,
    /// Per-request timeout for the auth service
    pub timeout: Duration,
}

impl AuthConfig {
    /// Resolve configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(API_URL_ENV)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let db_path = match lookup(DB_PATH_ENV).filter(|v| !v.trim().is_empty()) {
            Some(path) => expand_path(&path),
            None => default_db_path()?,
        };

        let timeout = match lookup(TIMEOUT_ENV) {
            Some(raw) => parse_timeout(&raw)?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            base_url,
            db_path,
            timeout,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_db_path(mut self, path: &str) -> Self {
        self.db_path = expand_path(path);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Parse a timeout given in whole seconds
pub fn parse_timeout(raw: &str) -> Result<Duration> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| Error::config(format!("{} must be a whole number of seconds, got '{}'", TIMEOUT_ENV, raw)))?;
    if secs == 0 {
        return Err(Error::config(format!("{} must be greater than zero", TIMEOUT_ENV)));
    }
    Ok(Duration::from_secs(secs))
}

/// Default location of the client storage database
pub fn default_db_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("com", "offbeats", "RSVP")
        .ok_or_else(|| Error::config("Could not determine project directories"))?;

    Ok(dirs.data_dir().join("rsvp.db"))
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

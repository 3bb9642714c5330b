//! CLI commands module
//!
//! Contains all CLI command implementations.

pub mod auth;
pub mod config;

use anyhow::{Context as _, Result};
use std::sync::Arc;

use crate::output::OutputFormat;
use rsvp_core::{AuthConfig, HttpAuthClient, SessionManager, SqliteStorage};

/// Shared context for all commands
pub struct Context {
    pub config: AuthConfig,
    pub format: OutputFormat,
    pub quiet: bool,
}

impl Context {
    /// Build the session for this invocation and run its startup check
    pub async fn open_session(&self) -> Result<SessionManager> {
        let api = HttpAuthClient::new(&self.config)?;
        let storage = SqliteStorage::open(&self.config.db_path)
            .await
            .with_context(|| format!("Failed to open client storage at {}", self.config.db_path.display()))?;

        Ok(SessionManager::start(Arc::new(api), Arc::new(storage)).await)
    }
}

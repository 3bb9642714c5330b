//! # rsvp-core
//!
//! Session and authentication core for the RSVP client.
//!
//! This crate provides:
//! - The session state manager (`session` module)
//! - The auth service client (`client` module)
//! - Durable client-side storage for the session token (`storage` module)
//! - Wire models shared with the auth service (`models` module)
//! - Configuration and unified error handling (`config`, `error` modules)
//!
//! A composition root builds one [`SessionManager`] and hands it to whatever
//! needs to read or change the session:
//!
//! ```ignore
//! use std::sync::Arc;
//! use rsvp_core::{AuthConfig, HttpAuthClient, SessionManager, SqliteStorage};
//!
//! let config = AuthConfig::from_env()?;
//! let api = Arc::new(HttpAuthClient::new(&config)?);
//! let storage = Arc::new(SqliteStorage::open(&config.db_path).await?);
//! let session = Arc::new(SessionManager::start(api, storage).await);
//!
//! session.login("student@college.edu", "correctpass").await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod storage;

// Re-exports for convenience
pub use client::{ApiError, AuthApi, HttpAuthClient};
pub use config::AuthConfig;
pub use error::{Error, Result};
pub use models::{AuthResponse, LoginRequest, RegistrationData, User, UserRole};
pub use session::{SessionManager, SessionState, SessionStatus};
pub use storage::{ClientStorage, MemoryStorage, SqliteStorage, AUTH_TOKEN_KEY};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_format() {
        let parts: Vec<&str> = version().split('.').collect();
        assert_eq!(parts.len(), 3, "Version should be in x.y.z format");
    }
}

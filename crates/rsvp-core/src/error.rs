//! Unified error handling for rsvp-core

use thiserror::Error;

/// Core error type for rsvp-core
#[derive(Error, Debug)]
pub enum Error {
    /// The auth service could not be reached (connect failure, timeout, reset)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The login endpoint rejected the credentials
    #[error("Authentication failed: {message}")]
    Authentication {
        status: Option<u16>,
        message: String,
    },

    /// The register endpoint rejected the payload
    #[error("Registration failed: {message}")]
    Registration {
        status: Option<u16>,
        message: String,
    },

    /// A 2xx response whose body did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for rsvp-core
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an authentication error
    pub fn authentication(status: Option<u16>, msg: impl Into<String>) -> Self {
        Error::Authentication {
            status,
            message: msg.into(),
        }
    }

    /// Create a registration error
    pub fn registration(status: Option<u16>, msg: impl Into<String>) -> Self {
        Error::Registration {
            status,
            message: msg.into(),
        }
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Error::Transport(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Whether the failure happened before the service produced a response
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

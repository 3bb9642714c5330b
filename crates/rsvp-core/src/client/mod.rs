//! Auth service client
//!
//! The session manager talks to the auth service through the [`AuthApi`]
//! trait so tests can substitute a scripted implementation. The production
//! implementation is [`HttpAuthClient`].
//!
//! | Operation | Method | Path |
//! |---|---|---|
//! | verify | GET | `/api/auth/verify` (bearer) |
//! | login | POST | `/api/auth/login` |
//! | logout | POST | `/api/auth/logout` (bearer) |
//! | register | POST | `/api/auth/register` |

mod http;

pub use http::HttpAuthClient;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{AuthResponse, LoginRequest, RegistrationData, User};

pub const VERIFY_PATH: &str = "/api/auth/verify";
pub const LOGIN_PATH: &str = "/api/auth/login";
pub const LOGOUT_PATH: &str = "/api/auth/logout";
pub const REGISTER_PATH: &str = "/api/auth/register";

// ============================================================================
// Error Types
// ============================================================================

/// Errors raised while talking to the auth service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// No response was received
    #[error("Network error: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// A 2xx response whose body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 401 or 403
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Transport("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Transport(format!("Connection failed: {}", err))
        } else if err.is_decode() {
            ApiError::InvalidResponse(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Status {
                status: status.as_u16(),
                message: format!("HTTP {}", status),
            }
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

// ============================================================================
// AuthApi Trait
// ============================================================================

/// Logical endpoints of the auth service
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange a stored token for the user it belongs to
    async fn verify(&self, token: &str) -> Result<User, ApiError>;

    /// Authenticate with email and password
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError>;

    /// Tell the service the token is no longer in use
    async fn logout(&self, token: &str) -> Result<(), ApiError>;

    /// Create an account; success also authenticates
    async fn register(&self, data: &RegistrationData) -> Result<AuthResponse, ApiError>;
}

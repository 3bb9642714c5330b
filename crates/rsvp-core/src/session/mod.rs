//! Session manager
//!
//! Single source of truth for "is a user signed in, and who are they". The
//! manager owns the current [`User`] and a loading flag, talks to the auth
//! service through [`AuthApi`], and keeps the opaque token in
//! [`ClientStorage`] under [`AUTH_TOKEN_KEY`].
//!
//! ```text
//!                 login / register ok
//!   ANONYMOUS  ─────────────────────────▶  AUTHENTICATED
//!       ▲                                       │
//!       └──────── logout / verify failure ──────┘
//!
//!   LOADING is an overlay while initialize, refresh, login or register runs.
//! ```
//!
//! At rest a stored token exists exactly when `current_user` is present.
//! The four mutating operations are serialized by an async mutex, so callers
//! may share one manager across tasks.


use std::fmt;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use crate::client::{ApiError, AuthApi};
use crate::error::{Error, Result};
use crate::models::{LoginRequest, RegistrationData, User};
use crate::storage::{ClientStorage, AUTH_TOKEN_KEY};

// ============================================================================
// State
// ============================================================================

/// Coarse session status derived from [`SessionState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Loading,
    Anonymous,
    Authenticated,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Loading => write!(f, "loading"),
            SessionStatus::Anonymous => write!(f, "anonymous"),
            SessionStatus::Authenticated => write!(f, "authenticated"),
        }
    }
}

/// Snapshot of the session as seen by UI collaborators
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub current_user: Option<User>,
    pub is_loading: bool,
}

impl SessionState {
    pub fn status(&self) -> SessionStatus {
        if self.is_loading {
            SessionStatus::Loading
        } else if self.current_user.is_some() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Anonymous
        }
    }
}

impl Default for SessionState {
    /// A fresh session is loading until its first check settles
    fn default() -> Self {
        Self {
            current_user: None,
            is_loading: true,
        }
    }
}

/// Sets `is_loading` on creation and clears it on drop, including when the
/// owning future is cancelled.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<SessionState>,
}

impl<'a> LoadingGuard<'a> {
    fn begin(state: &'a watch::Sender<SessionState>) -> Self {
        state.send_if_modified(|s| {
            let changed = !s.is_loading;
            s.is_loading = true;
            changed
        });
        Self { state }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|s| {
            let changed = s.is_loading;
            s.is_loading = false;
            changed
        });
    }
}

// ============================================================================
// SessionManager
// ============================================================================

/// Owns the authenticated-user state for one client process
pub struct SessionManager {
    api: Arc<dyn AuthApi>,
    storage: Arc<dyn ClientStorage>,
    state: watch::Sender<SessionState>,
    op_lock: Mutex<()>,
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Create a manager in the initial LOADING state without touching the
    /// network or storage. Call [`initialize`](Self::initialize) next, or use
    /// [`start`](Self::start).
    pub fn new(api: Arc<dyn AuthApi>, storage: Arc<dyn ClientStorage>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            api,
            storage,
            state,
            op_lock: Mutex::new(()),
        }
    }

    /// Create a manager and run the startup session check
    pub async fn start(api: Arc<dyn AuthApi>, storage: Arc<dyn ClientStorage>) -> Self {
        let manager = Self::new(api, storage);
        manager.initialize().await;
        manager
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().current_user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().current_user.is_some()
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.state.borrow().status()
    }

    /// Observe state transitions
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    /// Restore the session from the stored token.
    ///
    /// No token: anonymous, no network call. Otherwise the token is verified;
    /// any failure removes it and leaves the session anonymous. Failures are
    /// logged, never returned.
    pub async fn initialize(&self) {
        let _op = self.op_lock.lock().await;
        self.check_session().await;
    }

    /// Re-run the startup check, e.g. after an out-of-band profile change
    pub async fn refresh(&self) {
        let _op = self.op_lock.lock().await;
        self.check_session().await;
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    /// - `Validation` when either argument is empty (no request is sent)
    /// - `Authentication` when the service rejects the credentials
    /// - `Transport` when the service cannot be reached
    ///
    /// The session is unchanged on any error.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        if email.trim().is_empty() {
            return Err(Error::validation("email is required"));
        }
        if password.is_empty() {
            return Err(Error::validation("password is required"));
        }

        let _op = self.op_lock.lock().await;
        let _loading = LoadingGuard::begin(&self.state);

        let request = LoginRequest::new(email, password);
        let response = self.api.login(&request).await.map_err(|e| {
            log::warn!("[session] Login failed: {}", e);
            login_error(e)
        })?;

        self.establish(&response.token, response.user).await
    }

    /// Create an account; success signs the new user in.
    ///
    /// # Errors
    /// - `Registration` when the service rejects the payload
    /// - `Transport` when the service cannot be reached
    ///
    /// The session is unchanged on any error.
    pub async fn register(&self, data: &RegistrationData) -> Result<User> {
        let _op = self.op_lock.lock().await;
        let _loading = LoadingGuard::begin(&self.state);

        let response = self.api.register(data).await.map_err(|e| {
            log::warn!("[session] Registration failed: {}", e);
            registration_error(e)
        })?;

        self.establish(&response.token, response.user).await
    }

    /// Sign out.
    ///
    /// The service is notified best-effort; local state is cleared whether
    /// or not that succeeds, and the token is removed before this returns.
    pub async fn logout(&self) {
        let _op = self.op_lock.lock().await;

        match self.storage.get_item(AUTH_TOKEN_KEY).await {
            Ok(Some(token)) if !token.is_empty() => {
                if let Err(e) = self.api.logout(&token).await {
                    log::warn!("[session] Logout notification failed: {}", e);
                }
            }
            Ok(_) => log::debug!("[session] No stored token, skipping logout notification"),
            Err(e) => log::warn!("[session] Could not read stored token: {}", e),
        }

        self.discard_session().await;
        log::info!("[session] Signed out");
    }

    // ------------------------------------------------------------------------
    // Internals (callers hold `op_lock`)
    // ------------------------------------------------------------------------

    async fn check_session(&self) {
        let _loading = LoadingGuard::begin(&self.state);

        let token = match self.storage.get_item(AUTH_TOKEN_KEY).await {
            Ok(Some(token)) if !token.is_empty() => token,
            Ok(Some(_)) => {
                log::debug!("[session] Stored token is empty, discarding");
                self.discard_session().await;
                return;
            }
            Ok(None) => {
                log::debug!("[session] No stored token");
                self.set_user(None);
                return;
            }
            Err(e) => {
                log::warn!("[session] Could not read stored token, discarding: {}", e);
                self.discard_session().await;
                return;
            }
        };

        match self.api.verify(&token).await {
            Ok(user) => {
                log::info!("[session] Session restored for user {}", user.id);
                self.set_user(Some(user));
            }
            Err(e) if e.is_unauthorized() => {
                log::info!("[session] Stored token rejected, signing out");
                self.discard_session().await;
            }
            Err(e) => {
                log::warn!("[session] Session check failed: {}", e);
                self.discard_session().await;
            }
        }
    }

    /// Persist the token, then publish the user
    async fn establish(&self, token: &str, user: User) -> Result<User> {
        if token.is_empty() {
            return Err(Error::InvalidResponse("auth service returned an empty token".to_string()));
        }

        self.storage.set_item(AUTH_TOKEN_KEY, token).await.map_err(|e| {
            log::error!("[session] Failed to persist token: {}", e);
            e
        })?;

        log::info!("[session] Signed in as user {}", user.id);
        self.set_user(Some(user.clone()));
        Ok(user)
    }

    /// Remove the stored token and clear the user in one step
    async fn discard_session(&self) {
        if let Err(e) = self.storage.remove_item(AUTH_TOKEN_KEY).await {
            log::error!("[session] Failed to remove stored token: {}", e);
        }
        self.set_user(None);
    }

    fn set_user(&self, user: Option<User>) {
        self.state.send_if_modified(|s| {
            if s.current_user == user {
                return false;
            }
            s.current_user = user;
            true
        });
    }
}

fn login_error(err: ApiError) -> Error {
    match err {
        ApiError::Transport(msg) => Error::Transport(msg),
        ApiError::Status { status, message } => Error::authentication(Some(status), message),
        ApiError::InvalidResponse(msg) => Error::InvalidResponse(msg),
    }
}

fn registration_error(err: ApiError) -> Error {
    match err {
        ApiError::Transport(msg) => Error::Transport(msg),
        ApiError::Status { status, message } => Error::registration(Some(status), message),
        ApiError::InvalidResponse(msg) => Error::InvalidResponse(msg),
    }
}

//! Authentication session shared between the HTTP client and the auth store.
//!
//! The token lives in a [`KeyValueStore`] under [`AUTH_TOKEN_KEY`] so it
//! survives restarts. A 401/403 from any endpoint clears it through
//! [`Session::force_logout`].

use std::sync::{Arc, Mutex, MutexGuard};

use bazar_core::{KeyValueStore, User};

pub const AUTH_TOKEN_KEY: &str = "auth_token_v1";
pub const LOGIN_ROUTE: &str = "/login";

/// Navigation hook invoked when the server rejects the session.
pub trait LoginRedirect: Send + Sync {
    /// The route the user is currently on.
    fn current_route(&self) -> String;

    fn redirect_to_login(&self);
}

/// A [`LoginRedirect`] that never navigates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRedirect;

impl LoginRedirect for NoRedirect {
    fn current_route(&self) -> String {
        String::new()
    }

    fn redirect_to_login(&self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStatus {
    #[default]
    Anonymous,
    Authenticating,
    Authenticated,
    /// The stored token was rejected by verification.
    SessionInvalid,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub status: AuthStatus,
    pub token: Option<String>,
    pub user: Option<User>,
    pub error: Option<String>,
}

impl SessionSnapshot {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status == AuthStatus::Authenticated && self.token.is_some()
    }
}

pub struct Session {
    state: Mutex<SessionSnapshot>,
    storage: Arc<dyn KeyValueStore>,
    redirect: Arc<dyn LoginRedirect>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("Session")
            .field("status", &state.status)
            .field("has_token", &state.token.is_some())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Restores a session from `storage`.
    ///
    /// A stored token marks the session authenticated until a verification
    /// says otherwise. A storage read failure is logged and treated as no token.
    pub fn restore(storage: Arc<dyn KeyValueStore>, redirect: Arc<dyn LoginRedirect>) -> Self {
        let token = match storage.get(AUTH_TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.trim().is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored token");
                None
            }
        };
        let status = if token.is_some() {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Anonymous
        };
        Self {
            state: Mutex::new(SessionSnapshot {
                status,
                token,
                user: None,
                error: None,
            }),
            storage,
            redirect,
        }
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.lock().token.clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock().is_authenticated()
    }

    pub(crate) fn begin_login(&self) {
        let mut state = self.lock();
        state.status = AuthStatus::Authenticating;
        state.error = None;
    }

    /// Stores the token (persisted) and optional user, marking the session
    /// authenticated.
    pub(crate) fn establish(&self, token: String, user: Option<User>) {
        if let Err(e) = self.storage.set(AUTH_TOKEN_KEY, &token) {
            tracing::warn!(error = %e, "could not persist token");
        }
        let mut state = self.lock();
        state.status = AuthStatus::Authenticated;
        state.token = Some(token);
        state.user = user;
        state.error = None;
    }

    pub(crate) fn set_user(&self, user: User) {
        let mut state = self.lock();
        state.status = AuthStatus::Authenticated;
        state.user = Some(user);
        state.error = None;
    }

    pub(crate) fn fail_login(&self, message: String) {
        let mut state = self.lock();
        state.status = if state.token.is_some() {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Anonymous
        };
        state.error = Some(message);
    }

    /// Clears the token and user and returns to [`AuthStatus::Anonymous`].
    pub fn logout(&self) {
        self.clear(AuthStatus::Anonymous, None);
    }

    /// Clears credentials after a failed verification.
    pub(crate) fn invalidate(&self, message: &str) {
        self.clear(AuthStatus::SessionInvalid, Some(message.to_string()));
    }

    /// Clears the session after the server answered 401/403 and sends the
    /// user to the login route unless they are already there.
    pub fn force_logout(&self, status: u16) {
        tracing::warn!(status, "server rejected credentials, clearing session");
        self.logout();
        let route = self.redirect.current_route();
        if route.trim_end_matches('/').ends_with(LOGIN_ROUTE) {
            tracing::debug!(route, "already on login route, not redirecting");
            return;
        }
        self.redirect.redirect_to_login();
    }

    fn clear(&self, status: AuthStatus, error: Option<String>) {
        if let Err(e) = self.storage.remove(AUTH_TOKEN_KEY) {
            tracing::warn!(error = %e, "could not remove stored token");
        }
        let mut state = self.lock();
        state.status = status;
        state.token = None;
        state.user = None;
        state.error = error;
    }

    fn lock(&self) -> MutexGuard<'_, SessionSnapshot> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

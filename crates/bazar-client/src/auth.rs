//! Authentication state machine on top of [`ApiClient`] and [`Session`].
//!
//! ```text
//! Anonymous --login--> Authenticating --ok--> Authenticated
//!                                   \--err--> Anonymous (error set)
//! Authenticated --verify fails--> SessionInvalid
//! any --logout / 401 / 403--> Anonymous
//! ```

use std::sync::Arc;

use bazar_core::User;

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::session::{Session, SessionSnapshot};

/// Error recorded on the session when login fails without a server message.
pub const LOGIN_FAILED_MESSAGE: &str = "Error de autenticación";
/// Error recorded on the session when verification rejects the stored token.
pub const SESSION_EXPIRED_MESSAGE: &str = "Sesión expirada";

/// Result of [`AuthStore::verify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyOutcome {
    pub is_authenticated: bool,
    pub user: Option<User>,
}

impl VerifyOutcome {
    fn anonymous() -> Self {
        Self {
            is_authenticated: false,
            user: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthStore {
    client: ApiClient,
}

impl AuthStore {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        self.client.session()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.session().snapshot()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated()
    }

    /// Logs in and persists the token.
    ///
    /// When the login response carries no user, a follow-up verification
    /// fills it in. A failure of that follow-up is ignored.
    ///
    /// # Errors
    ///
    /// Returns the login request's error; the session records its message and
    /// drops back to its previous state.
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionSnapshot, ClientError> {
        let session = self.session();
        session.begin_login();

        let response = match self.client.request_login(username.trim(), password).await {
            Ok(response) => response,
            Err(e) => {
                let message = match &e {
                    ClientError::Api { .. } | ClientError::Unauthorized { .. } => e.user_message(),
                    _ => LOGIN_FAILED_MESSAGE.to_string(),
                };
                tracing::warn!(username, error = %e, "login failed");
                session.fail_login(message);
                return Err(e);
            }
        };

        let has_user = response.user.is_some();
        session.establish(response.token, response.user);
        tracing::info!(username, "logged in");

        if !has_user {
            match self.client.request_verify().await {
                Ok(Some(user)) => session.set_user(user),
                Ok(None) => {}
                Err(e) => tracing::debug!(error = %e, "post-login verification failed, ignoring"),
            }
        }
        Ok(session.snapshot())
    }

    /// Checks the stored token with the server.
    ///
    /// With no token this returns anonymous without a request. Any failure
    /// clears the session and marks it [`crate::AuthStatus::SessionInvalid`].
    pub async fn verify(&self) -> VerifyOutcome {
        let session = self.session();
        if session.token().is_none() {
            return VerifyOutcome::anonymous();
        }
        match self.client.request_verify().await {
            Ok(user) => {
                if let Some(user) = user.clone() {
                    session.set_user(user);
                }
                VerifyOutcome {
                    is_authenticated: session.is_authenticated(),
                    user: session.snapshot().user.or(user),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "session verification failed");
                session.invalidate(SESSION_EXPIRED_MESSAGE);
                VerifyOutcome::anonymous()
            }
        }
    }

    pub fn logout(&self) {
        self.session().logout();
        tracing::info!("logged out");
    }

    /// Verifies a restored token, if there is one.
    pub async fn init(&self) -> VerifyOutcome {
        if self.session().token().is_some() {
            self.verify().await
        } else {
            VerifyOutcome::anonymous()
        }
    }
}

//! The client-side auth session state machine.
//!
//! ```text
//!            initialize (token present)
//!  Loading ──────────────────────────────▶ Authenticated
//!     │                                      ▲      │
//!     │ initialize (no token)          login │      │ logout
//!     ▼                                      │      ▼
//!  Unauthenticated ◀─────────────────────────┴──────┘
//! ```
//!
//! Only the presence of a stored token is checked at startup, not its
//! validity.

use std::sync::Arc;

use tokio::sync::watch;

use rollcall_core::{
    LoginInput, RegisterInput, UserProfile, validate_login, validate_register_form,
};

use crate::api::AuthApi;
use crate::error::SessionError;
use crate::navigator::{Navigator, Route};
use crate::storage::{ACCESS_TOKEN_KEY, TokenStorage};

/// Message shown when a login fails without a server message.
pub const LOGIN_FALLBACK_MESSAGE: &str = "Failed to login. Please check your credentials.";
/// Message shown when a registration fails without a server message.
pub const REGISTER_FALLBACK_MESSAGE: &str = "Failed to register. Please try again.";

/// Authentication state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// The initial token check has not run yet.
    Loading,
    Unauthenticated,
    Authenticated,
}

/// Outcome of [`AuthSession::require_authenticated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Still loading; show a placeholder and ask again later.
    Pending,
    Granted,
    /// Not authenticated; the user was sent to the login view.
    Denied,
}

/// Client auth session.
///
/// Collaborators are injected so the session runs without a browser.
pub struct AuthSession {
    api: Arc<dyn AuthApi>,
    storage: Arc<dyn TokenStorage>,
    navigator: Arc<dyn Navigator>,
    state: watch::Sender<AuthState>,
}

impl AuthSession {
    /// Create a session in the [`AuthState::Loading`] state.
    #[must_use]
    pub fn new(
        api: Arc<dyn AuthApi>,
        storage: Arc<dyn TokenStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (state, _) = watch::channel(AuthState::Loading);
        Self {
            api,
            storage,
            navigator,
            state,
        }
    }

    /// Decide the initial state from the stored token.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the token cannot be read; the
    /// session is left unauthenticated.
    pub fn initialize(&self) -> Result<AuthState, SessionError> {
        let token = self.storage.get(ACCESS_TOKEN_KEY);
        let next = match token {
            Ok(Some(_)) => AuthState::Authenticated,
            Ok(None) | Err(_) => AuthState::Unauthenticated,
        };
        self.set_state(next);
        token?;
        Ok(next)
    }

    /// Log in, store the token, then go to the home view.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Validation` without contacting the server if the
    /// form is invalid, `SessionError::Api` if the server rejects the login and
    /// `SessionError::Storage` if the token cannot be stored. State is unchanged
    /// on error.
    pub async fn login(&self, input: &LoginInput) -> Result<(), SessionError> {
        let email = validate_login(input)?;

        let response = self.api.login(input).await?;
        self.storage.set(ACCESS_TOKEN_KEY, &response.access_token)?;

        tracing::info!(email = %email, "Logged in");
        self.set_state(AuthState::Authenticated);
        self.navigator.navigate(Route::Home);
        Ok(())
    }

    /// Register an account, then go to the login view.
    ///
    /// Registration does not log the user in.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Validation` without contacting the server if the
    /// form is invalid, and `SessionError::Api` if the server rejects it.
    pub async fn register(&self, input: &RegisterInput) -> Result<UserProfile, SessionError> {
        validate_register_form(input)?;

        let profile = self.api.register(input).await?;

        tracing::info!(user_id = %profile.id, email = %profile.email, "Registered");
        self.navigator.navigate(Route::Login);
        Ok(profile)
    }

    /// Forget the token, then go to the login view.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the token cannot be removed. The
    /// session is unauthenticated either way.
    pub fn logout(&self) -> Result<(), SessionError> {
        let removed = self.storage.remove(ACCESS_TOKEN_KEY);

        self.set_state(AuthState::Unauthenticated);
        self.navigator.navigate(Route::Login);

        Ok(removed?)
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        *self.state.borrow()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state() == AuthState::Authenticated
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state() == AuthState::Loading
    }

    /// The stored bearer token, if any.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the token cannot be read.
    pub fn access_token(&self) -> Result<Option<String>, SessionError> {
        Ok(self.storage.get(ACCESS_TOKEN_KEY)?)
    }

    /// Gate for views that need an authenticated user.
    ///
    /// Sends the user to the login view when access is denied.
    pub fn require_authenticated(&self) -> Access {
        match self.state() {
            AuthState::Loading => Access::Pending,
            AuthState::Authenticated => Access::Granted,
            AuthState::Unauthenticated => {
                self.navigator.navigate(Route::Login);
                Access::Denied
            }
        }
    }

    /// Receiver that observes every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    fn set_state(&self, next: AuthState) {
        let previous = self.state.send_replace(next);
        if previous != next {
            tracing::debug!(from = ?previous, to = ?next, "Auth state changed");
        }
    }
}

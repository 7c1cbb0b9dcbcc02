//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::db::UserStore;
use crate::services::password::PasswordHasher;
use crate::services::registration::RegistrationService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the user store and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    registration: RegistrationService,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration
    /// * `users` - User store backing the registration service
    /// * `hasher` - Password hasher used for new accounts
    #[must_use]
    pub fn new(
        config: ServerConfig,
        users: Arc<dyn UserStore>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                registration: RegistrationService::new(users, hasher),
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the registration service.
    #[must_use]
    pub fn registration(&self) -> &RegistrationService {
        &self.inner.registration
    }

    /// Get a reference to the user store.
    #[must_use]
    pub fn users(&self) -> &Arc<dyn UserStore> {
        self.inner.registration.users()
    }
}

//! Registration service.
//!
//! Turns a validated [`Registration`] into a stored [`User`]: checks the email
//! is free, hashes the password off the async runtime and persists the record.

mod error;

pub use error::RegistrationError;

use std::sync::Arc;

use secrecy::ExposeSecret;
use tracing::instrument;

use rollcall_core::{Email, Registration};

use crate::db::{RepositoryError, UserStore};
use crate::models::{NewUser, User};
use crate::services::password::{PasswordHashError, PasswordHasher};

/// Registration service.
///
/// Cheap to clone; the store and hasher are shared.
#[derive(Clone)]
pub struct RegistrationService {
    users: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl RegistrationService {
    /// Create a new registration service.
    #[must_use]
    pub fn new(users: Arc<dyn UserStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    /// The backing user store.
    #[must_use]
    pub fn users(&self) -> &Arc<dyn UserStore> {
        &self.users
    }

    /// Register a new user.
    ///
    /// The email pre-check avoids hashing for obvious duplicates. The store's
    /// uniqueness guard in `save` is what settles concurrent registrations,
    /// and a conflict there is reported the same way.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationError::EmailTaken` if the email is already registered.
    /// Returns `RegistrationError::Hashing` if the password cannot be hashed.
    /// Returns `RegistrationError::Repository` if the store fails.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn create(&self, registration: Registration) -> Result<User, RegistrationError> {
        let Registration {
            email,
            password,
            name,
            role,
        } = registration;

        if self.users.find_by_email(&email).await?.is_some() {
            tracing::warn!(email = %email, "Registration rejected, email already registered");
            return Err(RegistrationError::EmailTaken(email));
        }

        let hasher = Arc::clone(&self.hasher);
        let password_hash =
            tokio::task::spawn_blocking(move || hasher.hash(password.expose_secret()))
                .await
                .map_err(|e| PasswordHashError::Worker(e.to_string()))??;

        let user = self.users.create(NewUser {
            email,
            password_hash,
            name,
            role,
        });

        let saved = match self.users.save(&user).await {
            Ok(saved) => saved,
            Err(RepositoryError::Conflict(_)) => {
                tracing::warn!(email = %user.email, "Registration lost a race for the email");
                return Err(RegistrationError::EmailTaken(user.email));
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            user_id = %saved.id,
            email = %saved.email,
            role = %saved.role,
            "User registered"
        );

        Ok(saved)
    }

    /// Find a user by email.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationError::Repository` if the store fails.
    pub async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RegistrationError> {
        Ok(self.users.find_by_email(email).await?)
    }
}

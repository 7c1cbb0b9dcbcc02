//! Registration error types.

use thiserror::Error;

use rollcall_core::Email;

use crate::db::RepositoryError;
use crate::services::password::PasswordHashError;

/// Errors that can occur while registering a user.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Another user already owns this email.
    #[error("User with email '{0}' already exists")]
    EmailTaken(Email),

    /// The password could not be hashed.
    #[error("password hashing failed: {0}")]
    Hashing(#[from] PasswordHashError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

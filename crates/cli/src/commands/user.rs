//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create an officer, password read from the environment
//! ROLLCALL_USER_PASSWORD=... rollcall user create -e officer@example.com -n "Jane Doe"
//!
//! # Create an admin
//! rollcall user create -e admin@example.com -n "Admin Name" -r admin -p '...'
//! ```
//!
//! # Environment Variables
//!
//! - `ROLLCALL_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `ROLLCALL_USER_PASSWORD` - Password when `--password` is not given
//! - `ROLLCALL_PASSWORD_HASHER`, `ROLLCALL_BCRYPT_COST` - Same hashing settings as the server

use std::sync::Arc;

use thiserror::Error;

use rollcall_core::{RegisterInput, ValidationErrors, validate_registration};
use rollcall_server::config::{ConfigError, ServerConfig};
use rollcall_server::db::{self, PgUserStore};
use rollcall_server::models::User;
use rollcall_server::services::{RegistrationError, RegistrationService};

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserCommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The arguments failed validation.
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Registration failed (duplicate email, hashing, storage).
    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

/// Create a user directly in the database.
///
/// Runs the same validation and registration path as `POST /users`.
///
/// # Errors
///
/// Returns `UserCommandError` if the input is invalid, the database is not
/// configured or reachable, or the email is already registered.
pub async fn create(
    email: String,
    name: String,
    role: Option<String>,
    password: Option<String>,
) -> Result<User, UserCommandError> {
    let config = ServerConfig::from_env()?;

    let input = RegisterInput {
        email: Some(email),
        password,
        name: Some(name),
        role,
    };
    let registration = validate_registration(&input)?;

    let database_url = config
        .database_url
        .as_ref()
        .ok_or(UserCommandError::MissingEnvVar("ROLLCALL_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(database_url).await?;

    let service = RegistrationService::new(
        Arc::new(PgUserStore::new(pool)),
        config.password_hasher.build(config.bcrypt_cost),
    );

    tracing::info!(
        email = %registration.email,
        role = %registration.role,
        "Creating user"
    );
    let user = service.create(registration).await?;

    tracing::info!(
        "User created successfully! ID: {}, Email: {}, Role: {}",
        user.id,
        user.email,
        user.role
    );

    Ok(user)
}

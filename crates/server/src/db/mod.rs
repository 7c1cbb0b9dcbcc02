//! User persistence.
//!
//! # Tables
//!
//! - `users` - Registered accounts, `UNIQUE (email)`
//!
//! # Stores
//!
//! - [`PgUserStore`] - `PostgreSQL`, the production store
//! - [`MemoryUserStore`] - process-local map, used when no database URL is
//!   configured and in tests
//!
//! Both stores enforce email uniqueness inside `save`, which is what decides
//! the winner when two registrations for the same email race past the
//! service's pre-check.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p rollcall-cli -- migrate
//! ```

pub mod memory;
pub mod users;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use rollcall_core::{Email, UserId};

use crate::models::{NewUser, User};

pub use memory::MemoryUserStore;
pub use users::PgUserStore;

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique email). Carries the offending email.
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Persistence boundary for user records.
///
/// `email` is the natural key: no two saved users may share one, and
/// implementations must reject such a save with
/// [`RepositoryError::Conflict`] at the storage layer.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by exact email match.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    /// Find a user by ID.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Build a transient, unsaved user from `fields`.
    ///
    /// Assigns a fresh ID and sets both timestamps to now. Performs no I/O.
    fn create(&self, fields: NewUser) -> User {
        fields.into_user(Utc::now())
    }

    /// Persist `user`, inserting it or updating the record with the same ID.
    ///
    /// Updates keep `created_at` and refresh `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if another user already has the email.
    async fn save(&self, user: &User) -> Result<User, RepositoryError>;

    /// Number of stored users.
    async fn count(&self) -> Result<u64, RepositoryError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Open the user store for the configured database.
///
/// Falls back to a [`MemoryUserStore`] when no database URL is set. Records in
/// that store do not survive a restart.
///
/// # Errors
///
/// Returns `sqlx::Error` if the database connection cannot be established.
pub async fn open_store(
    database_url: Option<&SecretString>,
) -> Result<Arc<dyn UserStore>, sqlx::Error> {
    match database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            tracing::info!("Database pool created");
            Ok(Arc::new(PgUserStore::new(pool)))
        }
        None => {
            tracing::warn!("No database configured, users are kept in memory only");
            Ok(Arc::new(MemoryUserStore::new()))
        }
    }
}

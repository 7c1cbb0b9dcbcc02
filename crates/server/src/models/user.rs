//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use std::fmt;

use chrono::{DateTime, Utc};

use rollcall_core::{Email, UserId, UserProfile, UserRole};

/// A registered account (domain type).
///
/// `password_hash` holds the digest produced by the configured password
/// hasher. The plaintext is never stored.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID, generated at creation.
    pub id: UserId,
    /// User's email address (unique across all users).
    pub email: Email,
    /// Password digest.
    pub password_hash: String,
    /// Display name.
    pub name: String,
    /// Assigned role.
    pub role: UserRole,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The public view of this user, without the password digest.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("name", &self.name)
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Fields for a user that does not exist yet.
///
/// Turned into a transient [`User`] by
/// [`UserStore::create`](crate::db::UserStore::create), which assigns the ID
/// and timestamps.
#[derive(Clone)]
pub struct NewUser {
    /// Email address (unique across users)
    pub email: Email,
    /// Password digest, never the plaintext
    pub password_hash: String,
    /// Display name
    pub name: String,
    /// Role granted at creation
    pub role: UserRole,
}

impl NewUser {
    /// Build a transient user with a fresh ID, stamped at `now`.
    #[must_use]
    pub fn into_user(self, now: DateTime<Utc>) -> User {
        User {
            id: UserId::generate(),
            email: self.email,
            password_hash: self.password_hash,
            name: self.name,
            role: self.role,
            created_at: now,
            updated_at: now,
        }
    }
}

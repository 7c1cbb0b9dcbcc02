//! Public user representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Email, UserId, UserRole};

/// A user as exposed over the API.
///
/// Carries no credential material. The stored password digest never leaves the
/// server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique user ID.
    pub id: UserId,
    /// Email address (the account's identity key).
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Assigned role.
    pub role: UserRole,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

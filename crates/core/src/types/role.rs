//! User roles.

use serde::{Deserialize, Serialize};

/// Error returned when a string is not a known [`UserRole`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid role: {0} (expected one of: admin, officer)")]
pub struct UserRoleError(pub String);

/// Role assigned to an account.
///
/// The set is closed. Accounts registered without an explicit role become
/// officers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "user_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Administrator.
    Admin,
    /// Officer (the default).
    #[default]
    Officer,
}

impl UserRole {
    /// All roles, in declaration order.
    pub const ALL: [Self; 2] = [Self::Admin, Self::Officer];

    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Officer => "officer",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = UserRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "officer" => Ok(Self::Officer),
            _ => Err(UserRoleError(s.to_owned())),
        }
    }
}

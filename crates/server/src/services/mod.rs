//! Business logic services.
//!
//! # Services
//!
//! - `password` - Salted one-way password hashing (bcrypt, Argon2)
//! - `registration` - User registration on top of a [`UserStore`](crate::db::UserStore)

pub mod password;
pub mod registration;

pub use password::{HasherKind, PasswordHashError, PasswordHasher};
pub use registration::{RegistrationError, RegistrationService};

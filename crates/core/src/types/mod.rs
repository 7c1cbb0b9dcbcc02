//! Core types for Rollcall.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod profile;
pub mod role;

pub use email::{Email, EmailError};
pub use id::*;
pub use profile::UserProfile;
pub use role::{UserRole, UserRoleError};

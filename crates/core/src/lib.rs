//! Rollcall Core - Shared types library.
//!
//! This crate provides common types used across all Rollcall components:
//! - `server` - Registration backend (HTTP API)
//! - `session` - Client-side auth session (token storage, login/register flows)
//! - `cli` - Command-line tools for migrations and user management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and lets the server and the
//! client run exactly the same validation rules.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, roles and profiles
//! - [`validation`] - Field-level validation of registration and login input

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod validation;

pub use types::*;
pub use validation::{
    FieldError, LoginInput, RegisterInput, Registration, ValidationErrors, validate_login,
    validate_register_form, validate_registration,
};

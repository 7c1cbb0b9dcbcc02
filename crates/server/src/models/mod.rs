//! Domain models for the registration backend.

pub mod user;

pub use user::{NewUser, User};

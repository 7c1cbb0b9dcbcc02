//! Rollcall registration backend.
//!
//! This crate provides the server functionality as a library,
//! allowing it to be tested and reused by the CLI.
//!
//! # Layers
//!
//! - [`routes`] - HTTP handlers (`POST /users`, health checks)
//! - [`services`] - Registration and password hashing
//! - [`db`] - The [`UserStore`](db::UserStore) boundary and its implementations
//! - [`models`] - Stored user records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use routes::app;
pub use state::AppState;

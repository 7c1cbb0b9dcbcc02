//! Client-side auth session for Rollcall.
//!
//! [`AuthSession`] tracks whether the user is logged in, keeps the bearer
//! token in a [`TokenStorage`] under [`ACCESS_TOKEN_KEY`] and tells a
//! [`Navigator`] where to go after login, registration and logout.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use rollcall_core::LoginInput;
//! use rollcall_session::{AuthSession, FileStorage, HttpAuthApi, NavigationHistory};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let session = AuthSession::new(
//!     Arc::new(HttpAuthApi::new("http://localhost:3000")?),
//!     Arc::new(FileStorage::new("session.json")),
//!     Arc::new(NavigationHistory::new()),
//! );
//! session.initialize()?;
//! session.login(&LoginInput::new("a@x.com", "secret1")).await?;
//! assert!(session.is_authenticated());
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod error;
pub mod navigator;
pub mod session;
pub mod storage;

pub use api::{AuthApi, HttpAuthApi, LoginResponse};
pub use error::{ApiError, SessionError, StorageError};
pub use navigator::{NavigationHistory, Navigator, Route};
pub use session::{
    Access, AuthSession, AuthState, LOGIN_FALLBACK_MESSAGE, REGISTER_FALLBACK_MESSAGE,
};
pub use storage::{ACCESS_TOKEN_KEY, FileStorage, MemoryStorage, TokenStorage};

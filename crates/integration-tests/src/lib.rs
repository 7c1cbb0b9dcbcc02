//! Integration tests for Rollcall.
//!
//! # Running Tests
//!
//! ```bash
//! # In-memory tests (no external services)
//! cargo test -p rollcall-integration-tests
//!
//! # Including PostgreSQL-backed tests
//! ROLLCALL_TEST_DATABASE_URL=postgres://localhost/rollcall_test \
//!     cargo test -p rollcall-integration-tests -- --include-ignored
//! ```
//!
//! # Test Categories
//!
//! - `registration` - `POST /users` over real HTTP
//! - `session_client` - The session client against a running server
//! - `postgres` - `PgUserStore` against a real database (ignored by default)

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use reqwest::Client;
use serde_json::Value;
use tokio::task::JoinHandle;

use rollcall_server::config::ServerConfig;
use rollcall_server::db::{MemoryUserStore, UserStore};
use rollcall_server::services::password::BcryptHasher;
use rollcall_server::{AppState, app};

/// bcrypt cost used by test servers; the minimum, to keep tests fast.
pub const TEST_BCRYPT_COST: u32 = 4;

/// A server running on an ephemeral port.
///
/// The server task is aborted when the context is dropped.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub users: Arc<dyn UserStore>,
    handle: JoinHandle<()>,
}

impl TestContext {
    /// Start a server backed by a fresh in-memory store.
    pub async fn spawn() -> Self {
        Self::spawn_with_store(Arc::new(MemoryUserStore::new())).await
    }

    /// Start a server backed by `users`.
    pub async fn spawn_with_store(users: Arc<dyn UserStore>) -> Self {
        Self::spawn_with(users, |router| router).await
    }

    /// Start a server backed by `users`, letting the caller add routes.
    pub async fn spawn_with<F>(users: Arc<dyn UserStore>, extend: F) -> Self
    where
        F: FnOnce(Router) -> Router,
    {
        let state = AppState::new(
            ServerConfig::default(),
            Arc::clone(&users),
            Arc::new(BcryptHasher::new(TEST_BCRYPT_COST)),
        );
        let router = extend(app(state));

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Test server error");
        });

        Self {
            client: Client::new(),
            base_url: format!("http://{addr}"),
            users,
            handle,
        }
    }

    /// Absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `POST /users` with a JSON body, returning status and parsed body.
    pub async fn register(&self, body: &Value) -> (reqwest::StatusCode, Value) {
        let response = self
            .client
            .post(self.url("/users"))
            .json(body)
            .send()
            .await
            .expect("Failed to send registration request");
        let status = response.status();
        let json = response
            .json::<Value>()
            .await
            .expect("Response body is not JSON");
        (status, json)
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A unique email for tests sharing one store.
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", uuid::Uuid::new_v4().simple())
}

//! The session client driving a running server.
//!
//! The login endpoint belongs to a separate auth service, so these tests mount
//! a stand-in `POST /auth/login` next to the real registration routes.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::{Json, Router, http::StatusCode, routing::post};
use serde_json::{Value, json};

use rollcall_core::{LoginInput, RegisterInput, UserRole};
use rollcall_integration_tests::TestContext;
use rollcall_server::db::MemoryUserStore;
use rollcall_session::{
    AuthSession, AuthState, FileStorage, HttpAuthApi, MemoryStorage, NavigationHistory,
    REGISTER_FALLBACK_MESSAGE, Route, SessionError,
};

async fn stub_login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["password"] == "secret1" {
        (StatusCode::OK, Json(json!({"access_token": "stub-token"})))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"kind": "unauthorized", "message": "Invalid credentials"})),
        )
    }
}

async fn spawn() -> TestContext {
    TestContext::spawn_with(Arc::new(MemoryUserStore::new()), |router| {
        router.merge(Router::new().route("/auth/login", post(stub_login)))
    })
    .await
}

#[tokio::test]
async fn test_register_then_login_then_logout() {
    let ctx = spawn().await;
    let dir = tempfile::tempdir().unwrap();
    let history = Arc::new(NavigationHistory::new());
    let session = AuthSession::new(
        Arc::new(HttpAuthApi::new(&ctx.base_url).unwrap()),
        Arc::new(FileStorage::new(dir.path().join("session.json"))),
        history.clone(),
    );

    assert_eq!(session.initialize().unwrap(), AuthState::Unauthenticated);

    let profile = session
        .register(&RegisterInput::new(
            "a@x.com",
            "secret1",
            "Ada",
            Some(UserRole::Admin),
        ))
        .await
        .unwrap();
    assert_eq!(profile.role, UserRole::Admin);
    assert_eq!(history.current(), Some(Route::Login));
    assert!(!session.is_authenticated());

    session
        .login(&LoginInput::new("a@x.com", "secret1"))
        .await
        .unwrap();
    assert!(session.is_authenticated());
    assert_eq!(history.current(), Some(Route::Home));
    assert_eq!(session.access_token().unwrap().as_deref(), Some("stub-token"));

    session.logout().unwrap();
    assert_eq!(session.state(), AuthState::Unauthenticated);
    assert_eq!(session.access_token().unwrap(), None);
    assert_eq!(history.current(), Some(Route::Login));
}

#[tokio::test]
async fn test_duplicate_registration_shows_server_message() {
    let ctx = spawn().await;
    let session = AuthSession::new(
        Arc::new(HttpAuthApi::new(&ctx.base_url).unwrap()),
        Arc::new(MemoryStorage::new()),
        Arc::new(NavigationHistory::new()),
    );
    let input = RegisterInput::new("dup@x.com", "secret1", "Dup", None);

    session.register(&input).await.unwrap();
    let err = session.register(&input).await.unwrap_err();

    assert!(matches!(err, SessionError::Api(ref api) if api.status() == Some(409)));
    assert_eq!(
        err.user_message(REGISTER_FALLBACK_MESSAGE),
        "User with email 'dup@x.com' already exists"
    );
}

#[tokio::test]
async fn test_rejected_login_keeps_session_unauthenticated() {
    let ctx = spawn().await;
    let session = AuthSession::new(
        Arc::new(HttpAuthApi::new(&ctx.base_url).unwrap()),
        Arc::new(MemoryStorage::new()),
        Arc::new(NavigationHistory::new()),
    );
    session.initialize().unwrap();

    let err = session
        .login(&LoginInput::new("a@x.com", "wrong-password"))
        .await
        .unwrap_err();

    assert_eq!(err.user_message("fallback"), "Invalid credentials");
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_cached_token_survives_restart() {
    let ctx = spawn().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let first = AuthSession::new(
        Arc::new(HttpAuthApi::new(&ctx.base_url).unwrap()),
        Arc::new(FileStorage::new(&path)),
        Arc::new(NavigationHistory::new()),
    );
    first.initialize().unwrap();
    first
        .login(&LoginInput::new("a@x.com", "secret1"))
        .await
        .unwrap();
    drop(first);

    let second = AuthSession::new(
        Arc::new(HttpAuthApi::new(&ctx.base_url).unwrap()),
        Arc::new(FileStorage::new(&path)),
        Arc::new(NavigationHistory::new()),
    );
    assert!(second.is_loading());
    assert_eq!(second.initialize().unwrap(), AuthState::Authenticated);
}

//! Registration over real HTTP against an in-memory server.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::{Value, json};

use rollcall_integration_tests::{TestContext, unique_email};

#[tokio::test]
async fn test_register_returns_created_profile() {
    let ctx = TestContext::spawn().await;

    let (status, body) = ctx
        .register(&json!({
            "email": "a@x.com",
            "password": "secret1",
            "name": "A",
            "role": "officer"
        }))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "a@x.com");
    assert_eq!(body["name"], "A");
    assert_eq!(body["role"], "officer");
    assert!(body["created_at"].is_string());
    assert!(body["updated_at"].is_string());
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());

    let stored = ctx
        .users
        .find_by_email(&"a@x.com".parse().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_ne!(stored.password_hash, "secret1");
    assert_eq!(stored.id.to_string(), body["id"].as_str().unwrap());
}

#[tokio::test]
async fn test_repeat_registration_conflicts_without_second_record() {
    let ctx = TestContext::spawn().await;
    let body = json!({"email": "a@x.com", "password": "secret1", "name": "A", "role": "officer"});

    let (status, _) = ctx.register(&body).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, error) = ctx.register(&body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["kind"], "conflict");
    assert_eq!(error["message"], "User with email 'a@x.com' already exists");

    assert_eq!(ctx.users.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_validation_rejects_before_any_side_effect() {
    let ctx = TestContext::spawn().await;

    let cases: Vec<(Value, &str)> = vec![
        (json!({"password": "secret1", "name": "A"}), "email"),
        (json!({"email": "", "password": "secret1", "name": "A"}), "email"),
        (json!({"email": "not-an-email", "password": "secret1", "name": "A"}), "email"),
        (json!({"email": "a@x.com", "password": "12345", "name": "A"}), "password"),
        (json!({"email": "a@x.com", "password": "secret1", "name": ""}), "name"),
        (
            json!({"email": "a@x.com", "password": "secret1", "name": "A", "role": "superuser"}),
            "role",
        ),
    ];

    for (body, field) in cases {
        let (status, error) = ctx.register(&body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(error["kind"], "validation");
        let fields: Vec<&str> = error["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec![field], "body: {body}");
    }

    assert_eq!(ctx.users.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_missing_content_type_is_reported_on_body() {
    let ctx = TestContext::spawn().await;

    let response = ctx
        .client
        .post(ctx.url("/users"))
        .body(r#"{"email":"a@x.com"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["errors"][0]["field"], "body");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registrations_single_winner() {
    let ctx = TestContext::spawn().await;
    let email = unique_email("race");
    let body = json!({"email": email, "password": "secret1", "name": "Racer"});

    let (first, second) = tokio::join!(ctx.register(&body), ctx.register(&body));
    let mut statuses = [first.0, second.0];
    statuses.sort_by_key(StatusCode::as_u16);

    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::CONFLICT]);
    assert_eq!(ctx.users.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let ctx = TestContext::spawn().await;

    let response = ctx
        .client
        .get(ctx.url("/health"))
        .header("x-request-id", "it-42")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "it-42");

    let ready = ctx.client.get(ctx.url("/health/ready")).send().await.unwrap();
    assert_eq!(ready.status(), StatusCode::OK);
}

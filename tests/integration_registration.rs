#![allow(
    clippy::unwrap_used,
    clippy::panic,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    missing_debug_implementations,
    unreachable_pub,
    clippy::print_stdout
)]
use reqwest::StatusCode;
use serde_json::json;

mod common;

#[tokio::test]
async fn test_register_flow() {
    let app = common::TestApp::spawn().await;

    let resp = app.register("testuser", "testpass").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"message": "User registered successfully"}));

    let resp = app.register("testuser", "testpass").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"detail": "User already exists"}));

    // The failed attempt must not change the registry.
    assert_eq!(app.store.user_count(), 1);
}

#[tokio::test]
async fn test_duplicate_with_different_password_is_rejected() {
    let app = common::TestApp::spawn().await;
    app.register("alice", "one").await;

    let resp = app.register("alice", "two").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.store.usernames(), vec!["alice"]);
}

#[tokio::test]
async fn test_list_users_in_registration_order() {
    let app = common::TestApp::spawn().await;

    let (status, body) = app.get_json("/users/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"users": []}));

    for name in ["zoe", "adam", "mike"] {
        assert_eq!(app.register(name, "pw").await.status(), StatusCode::OK);
    }

    let (status, body) = app.get_json("/users/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"users": ["zoe", "adam", "mike"]}));
}

#[tokio::test]
async fn test_password_is_not_exposed() {
    let app = common::TestApp::spawn().await;
    app.register("alice", "hunter2").await;

    let resp = app.client.get(format!("{}/users/", app.server_url)).send().await.unwrap();
    let text = resp.text().await.unwrap();
    assert!(!text.contains("hunter2"));
}

#[tokio::test]
async fn test_register_malformed_body() {
    let app = common::TestApp::spawn().await;

    let resp = app
        .client
        .post(format!("{}/register/", app.server_url))
        .json(&json!({"username": "no_password"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["detail"].is_string());

    let resp = app
        .client
        .post(format!("{}/register/", app.server_url))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["detail"].is_string());

    assert_eq!(app.store.user_count(), 0);
}

#[tokio::test]
async fn test_register_empty_username() {
    let app = common::TestApp::spawn().await;

    let resp = app.register("", "pw").await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"detail": "username must not be empty"}));
    assert_eq!(app.store.user_count(), 0);
}

#[tokio::test]
async fn test_concurrent_registration_of_same_name() {
    let app = common::TestApp::spawn().await;

    let mut set = tokio::task::JoinSet::new();
    for _ in 0..5 {
        let client = app.client.clone();
        let url = format!("{}/register/", app.server_url);
        set.spawn(async move {
            client.post(url).json(&json!({"username": "racer", "password": "pw"})).send().await.unwrap().status()
        });
    }
    let statuses = set.join_all().await;

    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::OK).count(), 1);
    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::BAD_REQUEST).count(), 4);
    assert_eq!(app.store.usernames(), vec!["racer"]);
}

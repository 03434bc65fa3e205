#![allow(
    clippy::unwrap_used,
    clippy::panic,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    missing_debug_implementations,
    unreachable_pub,
    clippy::print_stdout
)]
use ingest_server::api::{self, MgmtState};
use ingest_server::services::health_service::HealthService;
use ingest_server::storage::Store;
use reqwest::StatusCode;
use tokio::net::TcpListener;
use tokio::sync::watch;

mod common;

#[tokio::test]
async fn test_livez() {
    let app = common::TestApp::spawn().await;

    let resp = app.client.get(format!("{}/livez", app.mgmt_url)).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_readyz_reports_user_count() {
    let app = common::TestApp::spawn().await;
    app.register("one", "pw").await;
    app.register("two", "pw").await;

    let resp = app.client.get(format!("{}/readyz", app.mgmt_url)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["users"], 2);
}

#[tokio::test]
async fn test_readyz_fails_once_shutting_down() {
    // A dedicated management listener that keeps serving while the flag flips.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let health_service = HealthService::new(Store::new(), shutdown_rx);
    let router = api::mgmt_router(MgmtState { health_service });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/readyz", listener.local_addr().unwrap());
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

    let client = reqwest::Client::new();
    assert_eq!(client.get(&url).send().await.unwrap().status(), StatusCode::OK);

    shutdown_tx.send(true).unwrap();

    let resp = client.get(&url).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "shutting_down");
    assert_eq!(body["users"], 0);
}

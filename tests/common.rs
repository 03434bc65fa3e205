#![allow(dead_code)]
use ingest_server::AppBuilder;
use ingest_server::api::{self, MgmtState};
use ingest_server::config::{Config, LogFormat, ServerConfig, TelemetryConfig, UploadConfig};
use ingest_server::storage::Store;
use reqwest::multipart::{Form, Part};
use serde_json::json;
use std::sync::Once;
use tokio::net::TcpListener;
use tokio::sync::watch;

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("ingest_server=debug".parse().unwrap())
            .add_directive("tower=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().init();
    });
}

pub fn get_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            mgmt_port: 0,
            shutdown_timeout_secs: 1,
            request_timeout_secs: 10,
        },
        upload: UploadConfig { max_upload_bytes: 1024 * 1024 },
        telemetry: TelemetryConfig { log_format: LogFormat::Text, otlp_endpoint: None, metrics_export_interval_secs: 60 },
    }
}

pub struct TestApp {
    pub server_url: String,
    pub mgmt_url: String,
    pub client: reqwest::Client,
    pub store: Store,
    pub config: Config,
    pub shutdown_tx: watch::Sender<bool>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_config(get_test_config()).await
    }

    pub async fn spawn_with_config(config: Config) -> Self {
        setup_tracing();

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let store = Store::new();
        let app = AppBuilder::new().with_store(store.clone()).with_shutdown_rx(shutdown_rx.clone()).build();

        let app_router = api::app_router(config.clone(), app.services);
        let mgmt_router = api::mgmt_router(MgmtState { health_service: app.health_service });

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let server_url = format!("http://{}", listener.local_addr().unwrap());
        let mgmt_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mgmt_url = format!("http://{}", mgmt_listener.local_addr().unwrap());

        let mut api_rx = shutdown_rx.clone();
        tokio::spawn(async move {
            axum::serve(listener, app_router)
                .with_graceful_shutdown(async move {
                    let _ = api_rx.wait_for(|&s| s).await;
                })
                .await
                .unwrap();
        });
        let mut mgmt_rx = shutdown_rx;
        tokio::spawn(async move {
            axum::serve(mgmt_listener, mgmt_router)
                .with_graceful_shutdown(async move {
                    let _ = mgmt_rx.wait_for(|&s| s).await;
                })
                .await
                .unwrap();
        });

        Self { server_url, mgmt_url, client: reqwest::Client::new(), store, config, shutdown_tx }
    }

    pub async fn register(&self, username: &str, password: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/register/", self.server_url))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .unwrap()
    }

    pub async fn upload(&self, username: &str, contents: impl Into<Vec<u8>>) -> reqwest::Response {
        let part = Part::bytes(contents.into()).file_name("test.csv").mime_str("text/csv").unwrap();
        self.client
            .post(format!("{}/upload/{}", self.server_url, username))
            .multipart(Form::new().part("file", part))
            .send()
            .await
            .unwrap()
    }

    pub async fn get_json(&self, path: &str) -> (reqwest::StatusCode, serde_json::Value) {
        let resp = self.client.get(format!("{}{}", self.server_url, path)).send().await.unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap())
    }
}

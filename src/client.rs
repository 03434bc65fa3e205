//! HTTP client for the ingest API, used by the `ingest-cli` binary.

use crate::api::schemas::accounts::UserList;
use crate::api::schemas::datasets::UserData;
use crate::api::schemas::{ErrorResponse, MessageResponse};
use crate::domain::table::Row;
use reqwest::{StatusCode, Url};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("File not found: {}", .0.display())]
    LocalFileMissing(PathBuf),
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{detail}")]
    Server { status: StatusCode, detail: String },
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// # Errors
    /// Returns `ClientError::InvalidUrl` if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// # Errors
    /// Returns `ClientError::InvalidUrl` if `base_url` is not an absolute http(s) URL.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    /// Appends `segments` to the base URL, percent-encoding each one so a username can
    /// never spill into the query, fragment or a neighbouring path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// # Errors
    /// Returns `ClientError::Server` with the server's detail if registration is refused.
    pub async fn register(&self, username: &str, password: &str) -> Result<String> {
        let response = self
            .http
            .post(self.endpoint(&["register", ""])?)
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?;
        Ok(decode::<MessageResponse>(response).await?.message)
    }

    /// Uploads a local table file for `username`.
    ///
    /// # Errors
    /// Returns `ClientError::LocalFileMissing` without contacting the server if `path`
    /// does not exist, `ClientError::Server` if the upload is refused.
    pub async fn upload(&self, username: &str, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(ClientError::LocalFileMissing(path.to_path_buf()));
        }
        let contents =
            tokio::fs::read(path).await.map_err(|source| ClientError::Io { path: path.to_path_buf(), source })?;
        let file_name = path.file_name().map_or_else(|| "upload.csv".to_string(), |n| n.to_string_lossy().into_owned());

        let part = Part::bytes(contents).file_name(file_name).mime_str("text/csv")?;
        let form = Form::new().part("file", part);

        let response = self.http.post(self.endpoint(&["upload", username])?).multipart(form).send().await?;
        Ok(decode::<MessageResponse>(response).await?.message)
    }

    /// # Errors
    /// Returns an error if the request fails.
    pub async fn list_users(&self) -> Result<Vec<String>> {
        let response = self.http.get(self.endpoint(&["users", ""])?).send().await?;
        Ok(decode::<UserList>(response).await?.users)
    }

    /// Rows via the wrapped `{"data": [...]}` endpoint.
    ///
    /// # Errors
    /// Returns `ClientError::Server` if the user does not exist.
    pub async fn user_data(&self, username: &str) -> Result<Vec<Row>> {
        let response = self.http.get(self.endpoint(&["user", username])?).send().await?;
        Ok(decode::<UserData>(response).await?.data)
    }

    /// Rows via the bare array endpoint.
    ///
    /// # Errors
    /// Returns `ClientError::Server` if the user does not exist.
    pub async fn raw_data(&self, username: &str) -> Result<Vec<Row>> {
        let response = self.http.get(self.endpoint(&["data", username])?).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let detail = match response.json::<ErrorResponse>().await {
        Ok(body) => body.detail,
        Err(_) => status.canonical_reason().unwrap_or("Request failed").to_string(),
    };
    Err(ClientError::Server { status, detail })
}

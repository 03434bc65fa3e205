use crate::domain::table::{Row, parse_table};
use crate::error::{AppError, Result};
use crate::storage::Store;
use axum::body::Bytes;
use opentelemetry::{global, metrics::Counter};

#[derive(Clone, Debug)]
struct Metrics {
    uploads_total: Counter<u64>,
    rows_ingested_total: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("ingest-server");
        Self {
            uploads_total: meter
                .u64_counter("ingest_uploads_total")
                .with_description("Total number of accepted table uploads")
                .build(),
            rows_ingested_total: meter
                .u64_counter("ingest_rows_ingested_total")
                .with_description("Total number of rows parsed from uploads")
                .build(),
        }
    }
}

/// Parses uploaded tables into a user's rows and serves them back.
#[derive(Clone, Debug)]
pub struct DatasetService {
    store: Store,
    metrics: Metrics,
}

impl DatasetService {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self { store, metrics: Metrics::new() }
    }

    /// Fails fast for unknown users so the upload body need not be read.
    ///
    /// # Errors
    /// Returns `AppError::UserNotFound` if the user is not registered.
    pub fn ensure_user(&self, username: &str) -> Result<()> {
        if self.store.user_exists(username) { Ok(()) } else { Err(AppError::UserNotFound) }
    }

    /// Decodes `contents` as UTF-8, parses it and appends the rows to the user's collection.
    /// Returns the number of rows parsed from this upload.
    ///
    /// # Errors
    /// Returns `AppError::UserNotFound` if the user is not registered,
    /// `AppError::DecodeFailure` if the contents are not valid UTF-8.
    #[tracing::instrument(
        skip(self, contents),
        fields(username = %username, upload_bytes = contents.len(), rows = tracing::field::Empty),
        err(level = "warn")
    )]
    pub async fn upload(&self, username: &str, contents: Bytes) -> Result<usize> {
        self.ensure_user(username)?;

        let rows = tokio::task::spawn_blocking(move || decode_table(&contents))
            .await
            .map_err(|_| AppError::Internal)??;
        let parsed = rows.len();
        tracing::Span::current().record("rows", parsed);

        let total = self.store.append_rows(username, rows)?;

        tracing::info!(total_rows = total, "File uploaded successfully");
        self.metrics.uploads_total.add(1, &[]);
        self.metrics.rows_ingested_total.add(parsed as u64, &[]);

        Ok(parsed)
    }

    /// Everything the user has uploaded so far, in upload order.
    ///
    /// # Errors
    /// Returns `AppError::UserNotFound` if the user is not registered.
    #[tracing::instrument(skip(self), err(level = "debug"))]
    pub fn rows(&self, username: &str) -> Result<Vec<Row>> {
        self.store.rows(username)
    }
}

/// Strict UTF-8 decode followed by table parsing; CPU-bound for large uploads.
fn decode_table(contents: &[u8]) -> Result<Vec<Row>> {
    let text = std::str::from_utf8(contents).map_err(|_| AppError::DecodeFailure)?;
    Ok(parse_table(text))
}

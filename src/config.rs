use clap::{Args, Parser, ValueEnum};

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub upload: UploadConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "INGEST_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port for the public API
    #[arg(long, env = "INGEST_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Port for the management server (health probes)
    #[arg(long, env = "INGEST_MGMT_PORT", default_value_t = 9000)]
    pub mgmt_port: u16,

    /// Seconds to wait for in-flight requests after a shutdown signal
    #[arg(long, env = "INGEST_SHUTDOWN_TIMEOUT_SECS", default_value_t = 5)]
    pub shutdown_timeout_secs: u64,

    /// Maximum time a single request may take
    #[arg(long, env = "INGEST_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,
}

#[derive(Clone, Debug, Args)]
pub struct UploadConfig {
    /// Maximum accepted upload body in bytes (Default: 10MB)
    #[arg(long, env = "INGEST_MAX_UPLOAD_BYTES", default_value_t = 10_485_760)]
    pub max_upload_bytes: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// Log output format
    #[arg(long, env = "INGEST_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// OTLP gRPC endpoint for traces and metrics; export is disabled when unset
    #[arg(long, env = "INGEST_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,

    /// How often metrics are pushed to the OTLP endpoint
    #[arg(long, env = "INGEST_METRICS_EXPORT_INTERVAL_SECS", default_value_t = 60)]
    pub metrics_export_interval_secs: u64,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }
}

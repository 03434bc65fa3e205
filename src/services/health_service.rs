use crate::storage::Store;
use opentelemetry::{global, metrics::Gauge};
use tokio::sync::watch;

#[derive(Clone, Debug)]
struct Metrics {
    status: Gauge<i64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("ingest-server");
        Self {
            status: meter
                .i64_gauge("ingest_health_status")
                .with_description("Readiness of the server (1 for ready, 0 otherwise)")
                .build(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct HealthService {
    store: Store,
    shutdown_rx: watch::Receiver<bool>,
    metrics: Metrics,
}

impl HealthService {
    #[must_use]
    pub fn new(store: Store, shutdown_rx: watch::Receiver<bool>) -> Self {
        Self { store, shutdown_rx, metrics: Metrics::new() }
    }

    /// Ready until a shutdown has been requested.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        let ready = !*self.shutdown_rx.borrow();
        self.metrics.status.record(i64::from(ready), &[]);
        ready
    }

    #[must_use]
    pub fn user_count(&self) -> usize {
        self.store.user_count()
    }
}

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{trace, warn};

use crate::storage::{CounterField, LinkRecord, LinkStore};

/// Counts visits. Best effort: a failed increment is logged and counted,
/// never surfaced to the visitor.
#[derive(Clone)]
pub struct VisitRecorder {
    store: Arc<dyn LinkStore>,
    failures: Arc<AtomicU64>,
}

impl VisitRecorder {
    pub fn new(store: Arc<dyn LinkStore>) -> Self {
        Self {
            store,
            failures: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Adds one to `record.clicks` with a single atomic store increment.
    pub async fn record_visit(&self, record: &LinkRecord) {
        match self
            .store
            .increment_field(&record.id, CounterField::Clicks, 1)
            .await
        {
            Ok(()) => trace!("Recorded visit for '{}'", record.short_code),
            Err(e) => self.note_failure(record, &e),
        }
    }

    /// Counts and logs a visit whose increment failed or was abandoned.
    pub fn note_failure(&self, record: &LinkRecord, reason: &dyn std::fmt::Display) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        warn!(
            link_id = %record.id,
            short_code = %record.short_code,
            "Accounting failure, visit not counted: {}",
            reason
        );
    }

    /// Runs [`record_visit`](Self::record_visit) on a spawned task.
    pub fn spawn_visit(&self, record: LinkRecord) -> tokio::task::JoinHandle<()> {
        let recorder = self.clone();
        tokio::spawn(async move { recorder.record_visit(&record).await })
    }

    /// Number of increments that failed since startup.
    pub fn accounting_failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }
}

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error};

use super::{CodeResolver, RedirectTarget, VisitRecorder, build_redirect};
use crate::config::{AccountingMode, RedirectConfig};
use crate::errors::{LinkhopError, ResolveError};
use crate::storage::{LinkRecord, LinkStore};

/// resolve → redirect → account, for one visit.
///
/// The deadline bounds resolution and, separately, inline accounting. The
/// redirect target is fixed before accounting starts, and accounting never
/// changes the outcome.
#[derive(Clone)]
pub struct RedirectFlow {
    resolver: CodeResolver,
    recorder: VisitRecorder,
    accounting: AccountingMode,
    deadline: Option<Duration>,
}

impl RedirectFlow {
    pub fn new(store: Arc<dyn LinkStore>, config: &RedirectConfig) -> Self {
        Self {
            resolver: CodeResolver::new(store.clone()),
            recorder: VisitRecorder::new(store),
            accounting: config.accounting,
            // 0 表示不设截止时间
            deadline: (config.request_timeout_ms > 0)
                .then(|| Duration::from_millis(config.request_timeout_ms)),
        }
    }

    pub async fn visit(&self, code: &str) -> Result<RedirectTarget, ResolveError> {
        let record = self.resolve_within_deadline(code).await?;
        Ok(self.dispatch(record).await)
    }

    async fn resolve_within_deadline(&self, code: &str) -> Result<LinkRecord, ResolveError> {
        let Some(deadline) = self.deadline else {
            return self.resolver.resolve(code).await;
        };
        match tokio::time::timeout(deadline, self.resolver.resolve(code)).await {
            Ok(result) => result,
            Err(_) => {
                error!("Resolving '{}' exceeded {:?}", code, deadline);
                Err(ResolveError::Infra(LinkhopError::database_operation(
                    format!("lookup timed out after {} ms", deadline.as_millis()),
                )))
            }
        }
    }

    /// Fixes the target, then accounts for the visit per the configured mode.
    async fn dispatch(&self, record: LinkRecord) -> RedirectTarget {
        let target = build_redirect(&record);
        debug!("Redirecting '{}' to {}", record.short_code, target.location);

        match self.accounting {
            AccountingMode::Detached => {
                self.recorder.spawn_visit(record);
            }
            AccountingMode::Inline => self.record_inline(&record).await,
        }

        target
    }

    /// Awaits the increment, giving up after the deadline. An abandoned
    /// increment may still land; it is reported as a failure either way.
    async fn record_inline(&self, record: &LinkRecord) {
        let Some(deadline) = self.deadline else {
            return self.recorder.record_visit(record).await;
        };
        if tokio::time::timeout(deadline, self.recorder.record_visit(record))
            .await
            .is_err()
        {
            self.recorder.note_failure(
                record,
                &format!("increment abandoned after {} ms", deadline.as_millis()),
            );
        }
    }

    pub fn recorder(&self) -> &VisitRecorder {
        &self.recorder
    }
}

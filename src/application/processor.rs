//! Job processing: validation, commit and best-effort side channels.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::application::stats::{StatsSnapshot, WorkerStats};
use crate::application::validator::{self, ValidationPolicy};
use crate::domain::entities::{ShortenJob, UrlRecord};
use crate::domain::sinks::{AnalyticsSink, PersistenceSink, SearchIndexSink};

/// What the consumer should do with the delivery after processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Committed to durable storage; acknowledge the delivery.
    Committed,
    /// Permanent business rejection; acknowledge and drop, a retry can
    /// never succeed.
    Rejected,
    /// Transient failure; leave the delivery unacknowledged so the
    /// transport redelivers it after the visibility timeout.
    Retry,
}

/// Applies the validator and drives a job through the sink adapters.
///
/// The persistence commit is invoked first and aborts processing on
/// failure; search indexing and analytics run afterwards in sequence and
/// are best-effort. Outcome counters are updated on every disposition.
pub struct JobProcessor<P, S, A> {
    persistence: Arc<P>,
    search_index: Arc<S>,
    analytics: Arc<A>,
    policy: ValidationPolicy,
    stats: WorkerStats,
}

impl<P, S, A> JobProcessor<P, S, A>
where
    P: PersistenceSink,
    S: SearchIndexSink,
    A: AnalyticsSink,
{
    pub fn new(
        persistence: Arc<P>,
        search_index: Arc<S>,
        analytics: Arc<A>,
        policy: ValidationPolicy,
    ) -> Self {
        Self {
            persistence,
            search_index,
            analytics,
            policy,
            stats: WorkerStats::new(),
        }
    }

    /// Processes one job and reports how to settle its delivery.
    ///
    /// Redelivered duplicates are safe: validation is deterministic, and
    /// the persistence sink upserts by `short_code`.
    pub async fn process(&mut self, job: &ShortenJob) -> Disposition {
        info!(
            "Processing URL - request {}: {} -> {}",
            job.request_id, job.original_url, job.short_url
        );

        if let Err(reason) = validator::validate(job, &self.policy) {
            warn!("Job rejected - request {}: {}", job.request_id, reason);
            self.stats.record_error();
            return Disposition::Rejected;
        }

        let record = UrlRecord::committed(job, Utc::now());

        if let Err(e) = self.persistence.commit(&record).await {
            warn!(
                "Commit failed - request {}: {}; leaving message for retry",
                job.request_id, e
            );
            self.stats.record_error();
            return Disposition::Retry;
        }

        if let Err(e) = self.search_index.index(&record).await {
            warn!("Search indexing failed for {}: {}", record.short_code, e);
        }

        if let Err(e) = self.analytics.emit(&record).await {
            warn!("Analytics emission failed for {}: {}", record.short_code, e);
        }

        self.stats.record_success();
        info!(
            "URL committed: {} -> {} (request {})",
            record.short_code, record.original_url, job.request_id
        );

        Disposition::Committed
    }

    /// Current counter snapshot for the periodic stats log.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

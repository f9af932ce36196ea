//! Processing outcome record handed to the sink adapters.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::ShortenJob;

/// Final state of a processed job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Committed,
    Rejected,
    Failed,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Committed => "committed",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        }
    }
}

/// The durable record produced from a validated [`ShortenJob`].
///
/// Built transiently per job at processing time and handed to the sink
/// adapters; the worker itself never stores it. Sinks must upsert keyed on
/// `short_code` so a redelivered job overwrites its own earlier commit
/// instead of duplicating it.
#[derive(Debug, Clone, Serialize)]
pub struct UrlRecord {
    pub short_code: String,
    pub original_url: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
    pub processed_at: DateTime<Utc>,
    pub status: RecordStatus,
    pub click_count: i64,
}

impl UrlRecord {
    /// Builds the committed outcome for a validated job.
    ///
    /// `created_at` falls back to `processed_at` when the producer omitted
    /// it; validation rejects such jobs before this point in the normal
    /// flow.
    pub fn committed(job: &ShortenJob, processed_at: DateTime<Utc>) -> Self {
        Self {
            short_code: job.short_code.clone(),
            original_url: job.original_url.clone(),
            short_url: job.short_url.clone(),
            created_at: job.created_at.unwrap_or(processed_at),
            processed_at,
            status: RecordStatus::Committed,
            click_count: 0,
        }
    }
}

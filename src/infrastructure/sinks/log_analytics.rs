//! Logging stand-in for the analytics sink.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::domain::entities::UrlRecord;
use crate::domain::sinks::AnalyticsSink;
use crate::error::SinkError;

/// Event payload a real analytics backend would receive.
#[derive(Debug, Serialize)]
struct AnalyticsEvent<'a> {
    event_type: &'static str,
    short_code: &'a str,
    timestamp: DateTime<Utc>,
}

/// An analytics sink that only logs the event it would emit.
///
/// The injection point for a real backend (CloudWatch, Datadog).
pub struct LogAnalytics;

impl LogAnalytics {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogAnalytics {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnalyticsSink for LogAnalytics {
    async fn emit(&self, record: &UrlRecord) -> Result<(), SinkError> {
        let event = AnalyticsEvent {
            event_type: "url_created",
            short_code: &record.short_code,
            timestamp: record.processed_at,
        };

        let payload = serde_json::to_string(&event)
            .map_err(|e| SinkError::Operation(e.to_string()))?;
        debug!("Analytics event emitted: {}", payload);

        Ok(())
    }
}

//! Analytics sink trait.

use crate::domain::entities::UrlRecord;
use crate::error::SinkError;
use async_trait::async_trait;

/// Best-effort analytics emission for committed URLs.
///
/// # Implementations
///
/// - [`crate::infrastructure::sinks::LogAnalytics`] - logging stub
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    /// Emits a `url_created` event for a committed record.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] on emission failures; the processor logs and
    /// swallows them.
    async fn emit(&self, record: &UrlRecord) -> Result<(), SinkError>;
}

//! Search index sink trait.

use crate::domain::entities::UrlRecord;
use crate::error::SinkError;
use async_trait::async_trait;

/// Best-effort search indexing of committed URLs.
///
/// Failures are logged and swallowed by the processor; a missing index
/// entry never invalidates a committed record.
///
/// # Implementations
///
/// - [`crate::infrastructure::sinks::LogSearchIndex`] - logging stub
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchIndexSink: Send + Sync {
    /// Indexes a committed record for lookup by code or URL.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] on indexing failures.
    async fn index(&self, record: &UrlRecord) -> Result<(), SinkError>;
}

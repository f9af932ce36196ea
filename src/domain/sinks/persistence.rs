//! Persistence sink trait for durable URL storage.

use crate::domain::entities::UrlRecord;
use crate::error::SinkError;
use async_trait::async_trait;

/// Durable storage for processed URL records.
///
/// The commit is the one correctness-critical sink call: a failure here
/// leaves the message on the queue for redelivery.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgPersistenceSink`] - PostgreSQL upsert
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PersistenceSink: Send + Sync {
    /// Commits a record, upserting by `short_code`.
    ///
    /// A repeated commit for the same `short_code` must be a no-op
    /// overwrite that leaves `click_count` untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] on storage failures; callers treat these as
    /// transient and retry via queue redelivery.
    async fn commit(&self, record: &UrlRecord) -> Result<(), SinkError>;
}

//! Logging stand-in for the search index sink.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::entities::UrlRecord;
use crate::domain::sinks::SearchIndexSink;
use crate::error::SinkError;

/// A search index sink that only logs.
///
/// Used until a real search backend (Elasticsearch, OpenSearch) is wired
/// in; the call contract and failure handling in the processor stay the
/// same either way.
pub struct LogSearchIndex;

impl LogSearchIndex {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogSearchIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchIndexSink for LogSearchIndex {
    async fn index(&self, record: &UrlRecord) -> Result<(), SinkError> {
        debug!("URL indexed for search: {}", record.short_code);
        Ok(())
    }
}

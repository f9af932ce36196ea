//! Sink adapter traits for the systems a committed URL flows into.
//!
//! Each sink is a single fallible boundary call. The persistence sink is
//! correctness-critical; search indexing and analytics are best-effort side
//! channels whose failures never undo a successful commit.
//!
//! All sinks receive at-least-once traffic and must write idempotently,
//! keyed on the record's `short_code`.

pub mod analytics;
pub mod persistence;
pub mod search_index;

pub use analytics::AnalyticsSink;
pub use persistence::PersistenceSink;
pub use search_index::SearchIndexSink;

#[cfg(test)]
pub use analytics::MockAnalyticsSink;
#[cfg(test)]
pub use persistence::MockPersistenceSink;
#[cfg(test)]
pub use search_index::MockSearchIndexSink;

//! Database-backed sink implementations.

pub mod pg_sink;

pub use pg_sink::PgPersistenceSink;

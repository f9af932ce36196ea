//! Boundary error types for the transport and sink adapters.
//!
//! Both taxonomies distinguish connectivity from operation failures. At
//! startup a connection error is fatal; once the consumer loop runs, every
//! variant is handled at the boundary where it occurs and never propagates
//! past the loop.

use thiserror::Error;

/// Errors raised by the queue transport.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue connection error: {0}")]
    Connection(String),
    #[error("queue operation error: {0}")]
    Operation(String),
    #[error("queue message serialization error: {0}")]
    Serialization(String),
}

/// Errors raised by a sink adapter call.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink connection error: {0}")]
    Connection(String),
    #[error("sink operation error: {0}")]
    Operation(String),
}

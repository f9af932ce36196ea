//! Queue transport contract for receiving and settling messages.

use crate::domain::entities::Envelope;
use crate::error::QueueError;
use async_trait::async_trait;
use std::time::Duration;

/// Message attribute value identifying shorten-URL processing jobs.
pub const MESSAGE_TYPE_URL_PROCESSING: &str = "URL_PROCESSING";

/// Parameters for a single receive call.
#[derive(Debug, Clone, Copy)]
pub struct ReceiveOptions {
    /// Maximum number of envelopes returned per call.
    pub max_messages: usize,
    /// Long-poll wait: the call blocks up to this long for at least one
    /// message before returning an empty batch.
    pub wait_time: Duration,
    /// Window during which a received message stays invisible to other
    /// consumers; unacknowledged messages become redeliverable after it.
    pub visibility_timeout: Duration,
}

/// An at-least-once message queue.
///
/// The transport may redeliver any message whose visibility timeout expired
/// before it was acknowledged (consumer crash, slow sink call); consumers
/// must tolerate duplicates.
///
/// # Implementations
///
/// - [`crate::infrastructure::queue::RedisQueue`] - Redis-backed queue
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueueTransport: Send + Sync {
    /// Receives up to `options.max_messages` envelopes, long-polling up to
    /// `options.wait_time` when the queue is empty.
    ///
    /// Returns an empty batch when nothing arrived within the wait; that is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError`] on transport connectivity or protocol
    /// failures. Callers treat these as transient.
    async fn receive(&self, options: ReceiveOptions) -> Result<Vec<Envelope>, QueueError>;

    /// Deletes a delivery by its receipt token.
    ///
    /// Idempotent: acknowledging an already-settled or expired token
    /// succeeds without effect.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError`] on transport failures; the message then
    /// redelivers after its visibility timeout and must be tolerated as a
    /// duplicate.
    async fn acknowledge(&self, receipt_token: &str) -> Result<(), QueueError>;
}

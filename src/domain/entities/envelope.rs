//! Delivery envelope wrapping a received queue message.

/// A queue message plus the delivery metadata needed to settle it.
///
/// The transport offers at-least-once delivery: `message_id` is stable
/// across redeliveries and serves log correlation only, while
/// `receipt_token` identifies this particular delivery and is required to
/// acknowledge it. Neither substitutes for application-level idempotency in
/// the sinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Transport-assigned message identifier, stable across redeliveries.
    pub message_id: String,
    /// Opaque token for this delivery; consumed by acknowledge.
    pub receipt_token: String,
    /// Raw serialized job payload.
    pub body: String,
}

impl Envelope {
    pub fn new(message_id: String, receipt_token: String, body: String) -> Self {
        Self {
            message_id,
            receipt_token,
            body,
        }
    }
}

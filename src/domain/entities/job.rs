//! Shorten-URL job model consumed from the processing queue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A shorten-URL job as published by the producer.
///
/// The producer (HTTP front end or the `enqueue` CLI) assigns every field;
/// the worker never generates codes or timestamps for a job.
///
/// # Deserialization
///
/// All fields default when absent, so a message with missing keys still
/// deserializes and is rejected by
/// [`crate::application::validator::validate`] with a reason, rather than
/// failing at the parse stage. Only bodies that are not JSON objects at all
/// count as unparseable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortenJob {
    /// Opaque producer-assigned request identifier, used for log correlation.
    #[serde(default)]
    pub request_id: String,
    /// Producer-assigned short code the URL will be reachable under.
    #[serde(default)]
    pub short_code: String,
    /// The URL being shortened.
    #[serde(default)]
    pub original_url: String,
    /// The full short URL presented to the end user.
    #[serde(default)]
    pub short_url: String,
    /// Producer-assigned creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ShortenJob {
    pub fn new(
        request_id: String,
        short_code: String,
        original_url: String,
        short_url: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            request_id,
            short_code,
            original_url,
            short_url,
            created_at: Some(created_at),
        }
    }
}

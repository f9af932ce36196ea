//! Redis-backed queue transport with visibility-timeout semantics.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::entities::Envelope;
use crate::domain::transport::{QueueTransport, ReceiveOptions};
use crate::error::QueueError;
use crate::utils::code_generator::generate_code;

/// Message wrapper stored on the queue.
///
/// Carries the transport-assigned message id (stable across redeliveries)
/// and the producer's message attributes alongside the raw job body.
#[derive(Debug, Serialize, Deserialize)]
struct QueuedMessage {
    id: String,
    message_type: String,
    enqueued_at: DateTime<Utc>,
    body: String,
}

/// Queue transport on top of Redis.
///
/// Three keys per queue:
/// - `<queue>:ready` - list of deliverable messages,
/// - `<queue>:inflight` - hash of receipt token to raw message for
///   deliveries inside their visibility window,
/// - `<queue>:pending` - sorted set of receipt tokens scored by visibility
///   deadline.
///
/// A receive first requeues in-flight messages whose deadline passed, so an
/// unacknowledged delivery becomes visible again to any consumer; this is
/// what makes running several worker processes against one queue safe.
pub struct RedisQueue {
    client: ConnectionManager,
    ready_key: String,
    inflight_key: String,
    pending_key: String,
}

impl RedisQueue {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Connection`] if the URL is invalid, the
    /// connection cannot be established, or the PING probe fails. Callers
    /// treat this as fatal at startup.
    pub async fn connect(redis_url: &str, queue_name: &str) -> Result<Self, QueueError> {
        info!("Connecting to queue at {}", redis_url);

        let client = Client::open(redis_url).map_err(|e| {
            QueueError::Connection(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| QueueError::Connection(format!("Failed to connect to Redis: {}", e)))?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| QueueError::Connection(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to queue '{}'", queue_name);

        Ok(Self {
            client: manager,
            ready_key: format!("{}:ready", queue_name),
            inflight_key: format!("{}:inflight", queue_name),
            pending_key: format!("{}:pending", queue_name),
        })
    }

    /// Publishes a job body, returning the assigned message id.
    ///
    /// Producer-side counterpart of [`QueueTransport::receive`]; used by
    /// the `enqueue` CLI and the HTTP front end.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError`] if the message cannot be serialized or
    /// pushed.
    pub async fn send(&self, body: String, message_type: &str) -> Result<String, QueueError> {
        let message = QueuedMessage {
            id: generate_code(),
            message_type: message_type.to_string(),
            enqueued_at: Utc::now(),
            body,
        };

        let raw = serde_json::to_string(&message)
            .map_err(|e| QueueError::Serialization(e.to_string()))?;

        let mut conn = self.client.clone();
        conn.lpush::<_, _, ()>(&self.ready_key, raw)
            .await
            .map_err(|e| QueueError::Operation(format!("LPUSH failed: {}", e)))?;

        debug!("Message {} queued ({})", message.id, message.message_type);
        Ok(message.id)
    }

    /// Moves in-flight messages whose visibility deadline passed back to
    /// the ready list.
    async fn requeue_expired(&self, conn: &mut ConnectionManager) -> Result<(), QueueError> {
        let now = Utc::now().timestamp();

        let expired: Vec<String> = conn
            .zrangebyscore(&self.pending_key, "-inf", now)
            .await
            .map_err(|e| QueueError::Operation(format!("ZRANGEBYSCORE failed: {}", e)))?;

        for receipt in expired {
            let raw: Option<String> = conn
                .hget(&self.inflight_key, &receipt)
                .await
                .map_err(|e| QueueError::Operation(format!("HGET failed: {}", e)))?;

            if let Some(raw) = raw {
                conn.lpush::<_, _, ()>(&self.ready_key, raw)
                    .await
                    .map_err(|e| QueueError::Operation(format!("LPUSH failed: {}", e)))?;
                conn.hdel::<_, _, ()>(&self.inflight_key, &receipt)
                    .await
                    .map_err(|e| QueueError::Operation(format!("HDEL failed: {}", e)))?;
                warn!("Visibility timeout expired, message requeued for redelivery");
            }

            conn.zrem::<_, _, ()>(&self.pending_key, &receipt)
                .await
                .map_err(|e| QueueError::Operation(format!("ZREM failed: {}", e)))?;
        }

        Ok(())
    }

    /// Records a popped message as in-flight and wraps it in an envelope.
    async fn check_out(
        &self,
        conn: &mut ConnectionManager,
        raw: String,
        options: &ReceiveOptions,
    ) -> Result<Envelope, QueueError> {
        // Foreign payloads that are not our wrapper still get delivered,
        // with a minted id; the consumer decides what to do with the body.
        let (message_id, body) = match serde_json::from_str::<QueuedMessage>(&raw) {
            Ok(message) => (message.id, message.body),
            Err(_) => (generate_code(), raw.clone()),
        };

        let receipt = generate_code();
        let deadline = Utc::now().timestamp() + options.visibility_timeout.as_secs() as i64;

        conn.hset::<_, _, _, ()>(&self.inflight_key, &receipt, &raw)
            .await
            .map_err(|e| QueueError::Operation(format!("HSET failed: {}", e)))?;
        conn.zadd::<_, _, _, ()>(&self.pending_key, &receipt, deadline)
            .await
            .map_err(|e| QueueError::Operation(format!("ZADD failed: {}", e)))?;

        Ok(Envelope::new(message_id, receipt, body))
    }

    /// Pops one ready message without blocking.
    async fn pop_ready(&self, conn: &mut ConnectionManager) -> Result<Option<String>, QueueError> {
        conn.rpop(&self.ready_key, None)
            .await
            .map_err(|e| QueueError::Operation(format!("RPOP failed: {}", e)))
    }
}

#[async_trait]
impl QueueTransport for RedisQueue {
    async fn receive(&self, options: ReceiveOptions) -> Result<Vec<Envelope>, QueueError> {
        let mut conn = self.client.clone();

        self.requeue_expired(&mut conn).await?;

        let mut envelopes = Vec::new();

        while envelopes.len() < options.max_messages {
            match self.pop_ready(&mut conn).await? {
                Some(raw) => envelopes.push(self.check_out(&mut conn, raw, &options).await?),
                None => break,
            }
        }

        // Long-poll: block for the first message only, then drain whatever
        // arrived with it.
        if envelopes.is_empty() && !options.wait_time.is_zero() {
            let popped: Option<(String, String)> = conn
                .brpop(&self.ready_key, options.wait_time.as_secs_f64())
                .await
                .map_err(|e| QueueError::Operation(format!("BRPOP failed: {}", e)))?;

            if let Some((_, raw)) = popped {
                envelopes.push(self.check_out(&mut conn, raw, &options).await?);

                while envelopes.len() < options.max_messages {
                    match self.pop_ready(&mut conn).await? {
                        Some(raw) => {
                            envelopes.push(self.check_out(&mut conn, raw, &options).await?)
                        }
                        None => break,
                    }
                }
            }
        }

        Ok(envelopes)
    }

    async fn acknowledge(&self, receipt_token: &str) -> Result<(), QueueError> {
        let mut conn = self.client.clone();

        conn.zrem::<_, _, ()>(&self.pending_key, receipt_token)
            .await
            .map_err(|e| QueueError::Operation(format!("ZREM failed: {}", e)))?;
        conn.hdel::<_, _, ()>(&self.inflight_key, receipt_token)
            .await
            .map_err(|e| QueueError::Operation(format!("HDEL failed: {}", e)))?;

        Ok(())
    }
}

//! PostgreSQL implementation of the persistence sink.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::UrlRecord;
use crate::domain::sinks::PersistenceSink;
use crate::error::SinkError;

/// PostgreSQL storage for processed URL records.
///
/// Commits are upserts keyed on `short_code`: a redelivered job overwrites
/// its own row's metadata and leaves `click_count` alone, so at-least-once
/// delivery produces no visible duplicates.
pub struct PgPersistenceSink {
    pool: Arc<PgPool>,
}

impl PgPersistenceSink {
    /// Creates a new sink over a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersistenceSink for PgPersistenceSink {
    async fn commit(&self, record: &UrlRecord) -> Result<(), SinkError> {
        sqlx::query(
            r#"
        INSERT INTO processed_urls
            (short_code, original_url, short_url, created_at, processed_at, status, click_count)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (short_code) DO UPDATE
        SET original_url = EXCLUDED.original_url,
            short_url    = EXCLUDED.short_url,
            processed_at = EXCLUDED.processed_at,
            status       = EXCLUDED.status
        "#,
        )
        .bind(&record.short_code)
        .bind(&record.original_url)
        .bind(&record.short_url)
        .bind(record.created_at)
        .bind(record.processed_at)
        .bind(record.status.as_str())
        .bind(record.click_count)
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| SinkError::Operation(e.to_string()))?;

        Ok(())
    }
}

//! Worker runtime setup.
//!
//! Connects the transport and database, wires the processor and consumer
//! loop, and runs until a termination signal drains the worker.

use crate::application::consumer::{Consumer, ConsumerConfig};
use crate::application::processor::JobProcessor;
use crate::application::validator::ValidationPolicy;
use crate::config::Config;
use crate::infrastructure::persistence::PgPersistenceSink;
use crate::infrastructure::queue::RedisQueue;
use crate::infrastructure::sinks::{LogAnalytics, LogSearchIndex};
use crate::shutdown::install_shutdown_handler;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;

/// Runs the worker with the given configuration.
///
/// Initializes:
/// - Redis queue transport (with connectivity probe)
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Sink adapters, job processor and consumer loop
/// - Signal-driven graceful shutdown
///
/// # Errors
///
/// Returns an error if the queue or database is unreachable at startup or
/// migrations fail; once the loop is running, no single-message failure
/// terminates the worker.
pub async fn run(config: Config) -> Result<()> {
    let transport = RedisQueue::connect(&config.queue_url, &config.queue_name)
        .await
        .context("Queue connectivity check failed")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let persistence = Arc::new(PgPersistenceSink::new(Arc::new(pool)));
    let search_index = Arc::new(LogSearchIndex::new());
    let analytics = Arc::new(LogAnalytics::new());

    let processor = JobProcessor::new(
        persistence,
        search_index,
        analytics,
        ValidationPolicy::new(config.blocked_domains.clone()),
    );

    let consumer_config = ConsumerConfig {
        max_messages: config.max_messages,
        wait_time: Duration::from_secs(config.wait_time_seconds),
        visibility_timeout: Duration::from_secs(config.visibility_timeout),
        poll_interval: Duration::from_secs(config.poll_interval),
    };

    let shutdown = install_shutdown_handler();
    let consumer = Consumer::new(Arc::new(transport), processor, consumer_config, shutdown);

    tracing::info!("Worker started");
    let final_stats = consumer.run().await;

    tracing::info!(
        "Final stats: {} processed, {} errors, {:.1}% success, {:.0}s uptime",
        final_stats.processed_count,
        final_stats.error_count,
        final_stats.success_rate,
        final_stats.uptime_seconds
    );

    Ok(())
}

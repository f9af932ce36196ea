//! Queue consumer loop: polling, message lifecycle and graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::application::processor::{Disposition, JobProcessor};
use crate::application::stats::StatsSnapshot;
use crate::domain::entities::{Envelope, ShortenJob};
use crate::domain::sinks::{AnalyticsSink, PersistenceSink, SearchIndexSink};
use crate::domain::transport::{QueueTransport, ReceiveOptions};

/// Consumer loop tunables, sourced from [`crate::config::Config`].
#[derive(Debug, Clone, Copy)]
pub struct ConsumerConfig {
    /// Batch size cap per receive call.
    pub max_messages: usize,
    /// Long-poll wait for the receive call.
    pub wait_time: Duration,
    /// Visibility window requested for received messages.
    pub visibility_timeout: Duration,
    /// Pause after a failed receive call, preventing a tight error loop
    /// against an unreachable transport.
    pub poll_interval: Duration,
}

impl ConsumerConfig {
    fn receive_options(&self) -> ReceiveOptions {
        ReceiveOptions {
            max_messages: self.max_messages,
            wait_time: self.wait_time,
            visibility_timeout: self.visibility_timeout,
        }
    }
}

/// Lifecycle of the worker loop.
///
/// `Running` until a termination signal arrives; `Draining` while the
/// in-flight batch finishes; `Stopped` once no further receive will be
/// issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkerState {
    Running,
    Draining,
    Stopped,
}

/// Single sequential worker over one queue.
///
/// One receive/process cycle at a time; the receive call is the only
/// suspension point. Horizontal scaling happens by running more worker
/// processes against the same queue, with the transport's visibility
/// timeout providing per-message mutual exclusion across them.
///
/// Cancellation is observed only at safe points - around the receive call
/// and between cycles - so a batch that started processing always finishes
/// and no message ends up processed but unacknowledged.
pub struct Consumer<Q, P, S, A> {
    transport: Arc<Q>,
    processor: JobProcessor<P, S, A>,
    config: ConsumerConfig,
    shutdown: CancellationToken,
    state: WorkerState,
}

impl<Q, P, S, A> Consumer<Q, P, S, A>
where
    Q: QueueTransport,
    P: PersistenceSink,
    S: SearchIndexSink,
    A: AnalyticsSink,
{
    pub fn new(
        transport: Arc<Q>,
        processor: JobProcessor<P, S, A>,
        config: ConsumerConfig,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            transport,
            processor,
            config,
            shutdown,
            state: WorkerState::Running,
        }
    }

    /// Runs the polling loop until a termination signal is observed.
    ///
    /// Returns the final counter snapshot for the shutdown report. All
    /// steady-state failures are handled inside the loop; none propagate.
    pub async fn run(mut self) -> StatsSnapshot {
        info!("Starting message polling");

        while self.state == WorkerState::Running {
            if self.shutdown.is_cancelled() {
                break;
            }

            let received = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                received = self.transport.receive(self.config.receive_options()) => received,
            };

            match received {
                Ok(batch) if batch.is_empty() => {
                    // The long-poll wait already was the backoff.
                    debug!("No messages received, continuing polling");
                }
                Ok(batch) => {
                    info!("Received {} messages", batch.len());
                    self.process_batch(batch).await;

                    let stats = self.processor.stats();
                    info!(
                        "Stats: {} processed, {} errors, {:.1}% success",
                        stats.processed_count, stats.error_count, stats.success_rate
                    );
                }
                Err(e) => {
                    error!("Receive failed: {}; retrying in {:?}", e, self.config.poll_interval);
                    tokio::select! {
                        biased;
                        _ = self.shutdown.cancelled() => break,
                        _ = tokio::time::sleep(self.config.poll_interval) => {}
                    }
                }
            }
        }

        self.state = WorkerState::Stopped;
        info!("Worker stopped");
        self.processor.stats()
    }

    /// Handles one received batch in receipt order, always to completion.
    async fn process_batch(&mut self, batch: Vec<Envelope>) {
        for envelope in batch {
            if self.shutdown.is_cancelled() && self.state == WorkerState::Running {
                self.state = WorkerState::Draining;
                info!("Termination signaled, finishing current batch");
            }

            self.handle_envelope(envelope).await;
        }

        if self.state == WorkerState::Draining {
            self.state = WorkerState::Stopped;
        }
    }

    async fn handle_envelope(&mut self, envelope: Envelope) {
        debug!("Processing message {}", envelope.message_id);

        let job: ShortenJob = match serde_json::from_str(&envelope.body) {
            Ok(job) => job,
            Err(e) => {
                // A payload that cannot be parsed can never succeed; drop
                // it instead of letting it redeliver forever.
                error!("Unparseable message {} dropped: {}", envelope.message_id, e);
                self.acknowledge(&envelope).await;
                return;
            }
        };

        match self.processor.process(&job).await {
            Disposition::Committed => {
                self.acknowledge(&envelope).await;
                debug!("Message {} processed and removed from queue", envelope.message_id);
            }
            Disposition::Rejected => {
                self.acknowledge(&envelope).await;
                info!("Message {} permanently rejected and dropped", envelope.message_id);
            }
            Disposition::Retry => {
                warn!(
                    "Message {} left on queue, will redeliver after visibility timeout",
                    envelope.message_id
                );
            }
        }
    }

    async fn acknowledge(&self, envelope: &Envelope) {
        if let Err(e) = self.transport.acknowledge(&envelope.receipt_token).await {
            // The message will redeliver; sinks tolerate the duplicate.
            error!("Acknowledge failed for message {}: {}", envelope.message_id, e);
        }
    }
}

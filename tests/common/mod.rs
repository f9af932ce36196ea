#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio_util::sync::CancellationToken;

use url_processor::application::consumer::{Consumer, ConsumerConfig};
use url_processor::application::processor::JobProcessor;
use url_processor::application::validator::ValidationPolicy;
use url_processor::domain::entities::{Envelope, ShortenJob, UrlRecord};
use url_processor::domain::sinks::{AnalyticsSink, PersistenceSink, SearchIndexSink};
use url_processor::domain::transport::{QueueTransport, ReceiveOptions};
use url_processor::error::{QueueError, SinkError};

/// In-memory queue with explicit redelivery control.
///
/// Receives move messages to an in-flight map; `requeue_unacked` simulates
/// visibility-timeout expiry by making every unacknowledged delivery
/// receivable again.
#[derive(Default)]
pub struct InMemoryQueue {
    state: Mutex<QueueState>,
}

#[derive(Default)]
struct QueueState {
    ready: Vec<String>,
    inflight: HashMap<String, String>,
    next_receipt: u64,
}

impl InMemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, body: impl Into<String>) {
        self.state.lock().unwrap().ready.push(body.into());
    }

    pub fn push_job(&self, job: &ShortenJob) {
        self.push(serde_json::to_string(job).unwrap());
    }

    /// Simulates visibility-timeout expiry for all unacknowledged messages.
    pub fn requeue_unacked(&self) {
        let mut state = self.state.lock().unwrap();
        let bodies: Vec<String> = state.inflight.drain().map(|(_, body)| body).collect();
        state.ready.extend(bodies);
    }

    pub fn is_drained(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.ready.is_empty() && state.inflight.is_empty()
    }

    pub fn inflight_count(&self) -> usize {
        self.state.lock().unwrap().inflight.len()
    }
}

#[async_trait]
impl QueueTransport for InMemoryQueue {
    async fn receive(&self, options: ReceiveOptions) -> Result<Vec<Envelope>, QueueError> {
        let envelopes = {
            let mut state = self.state.lock().unwrap();
            let count = options.max_messages.min(state.ready.len());
            let bodies: Vec<String> = state.ready.drain(..count).collect();

            bodies
                .into_iter()
                .map(|body| {
                    state.next_receipt += 1;
                    let receipt = format!("receipt-{}", state.next_receipt);
                    state.inflight.insert(receipt.clone(), body.clone());
                    Envelope::new(format!("m-{}", state.next_receipt), receipt, body)
                })
                .collect::<Vec<_>>()
        };

        if envelopes.is_empty() {
            // Keep the polling loop from spinning in tests.
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        Ok(envelopes)
    }

    async fn acknowledge(&self, receipt_token: &str) -> Result<(), QueueError> {
        self.state.lock().unwrap().inflight.remove(receipt_token);
        Ok(())
    }
}

/// Persistence fake recording commits by short code, failing on demand.
#[derive(Default)]
pub struct RecordingPersistence {
    records: Mutex<HashMap<String, UrlRecord>>,
    attempts: AtomicUsize,
    fail_next: AtomicUsize,
}

impl RecordingPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `n` commit calls fail.
    pub fn fail_next(&self, n: usize) {
        self.fail_next.store(n, Ordering::SeqCst);
    }

    /// Total commit calls, including failed ones.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn committed_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn get(&self, short_code: &str) -> Option<UrlRecord> {
        self.records.lock().unwrap().get(short_code).cloned()
    }

    /// Simulates redirect traffic accumulating on a stored record.
    pub fn set_click_count(&self, short_code: &str, clicks: i64) {
        if let Some(record) = self.records.lock().unwrap().get_mut(short_code) {
            record.click_count = clicks;
        }
    }
}

#[async_trait]
impl PersistenceSink for RecordingPersistence {
    async fn commit(&self, record: &UrlRecord) -> Result<(), SinkError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self
            .fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(SinkError::Operation("simulated outage".to_string()));
        }

        let mut records = self.records.lock().unwrap();
        match records.get_mut(&record.short_code) {
            // Idempotent overwrite: metadata refreshes, click_count stays.
            Some(existing) => {
                let click_count = existing.click_count;
                *existing = record.clone();
                existing.click_count = click_count;
            }
            None => {
                records.insert(record.short_code.clone(), record.clone());
            }
        }

        Ok(())
    }
}

/// Best-effort sink fake counting calls, failing on demand.
#[derive(Default)]
pub struct FlakySink {
    calls: AtomicUsize,
    fail_next: AtomicUsize,
}

impl FlakySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self, n: usize) {
        self.fail_next.store(n, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) -> Result<(), SinkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self
            .fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(SinkError::Operation("simulated outage".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SearchIndexSink for FlakySink {
    async fn index(&self, _record: &UrlRecord) -> Result<(), SinkError> {
        self.record_call()
    }
}

#[async_trait]
impl AnalyticsSink for FlakySink {
    async fn emit(&self, _record: &UrlRecord) -> Result<(), SinkError> {
        self.record_call()
    }
}

pub fn test_job(request_id: &str, short_code: &str) -> ShortenJob {
    ShortenJob::new(
        request_id.to_string(),
        short_code.to_string(),
        format!("https://example.com/{short_code}"),
        format!("https://s.ly/{short_code}"),
        Utc::now(),
    )
}

pub struct TestWorker {
    pub queue: Arc<InMemoryQueue>,
    pub persistence: Arc<RecordingPersistence>,
    pub search_index: Arc<FlakySink>,
    pub analytics: Arc<FlakySink>,
    pub shutdown: CancellationToken,
}

impl TestWorker {
    pub fn new() -> Self {
        Self {
            queue: Arc::new(InMemoryQueue::new()),
            persistence: Arc::new(RecordingPersistence::new()),
            search_index: Arc::new(FlakySink::new()),
            analytics: Arc::new(FlakySink::new()),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn consumer(
        &self,
    ) -> Consumer<InMemoryQueue, RecordingPersistence, FlakySink, FlakySink> {
        let processor = JobProcessor::new(
            self.persistence.clone(),
            self.search_index.clone(),
            self.analytics.clone(),
            ValidationPolicy::new(vec!["malware.com".to_string(), "spam.site".to_string()]),
        );

        let config = ConsumerConfig {
            max_messages: 10,
            wait_time: Duration::from_millis(10),
            visibility_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(10),
        };

        Consumer::new(self.queue.clone(), processor, config, self.shutdown.clone())
    }

    /// Cancels the worker once the queue is fully drained (or the deadline
    /// passes), so `run` returns.
    pub async fn cancel_when_drained(&self) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while !self.queue.is_drained() && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        self.shutdown.cancel();
    }
}

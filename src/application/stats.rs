//! Worker processing counters.

use chrono::{DateTime, Utc};

/// Process-wide outcome counters.
///
/// Owned by the job processor and mutated only from the single consumer
/// task, so plain fields suffice; switching to batch-level concurrency
/// would require atomics or a message-passing aggregation instead.
/// Reset only by process restart.
#[derive(Debug)]
pub struct WorkerStats {
    processed_count: u64,
    error_count: u64,
    start_time: DateTime<Utc>,
}

impl WorkerStats {
    pub fn new() -> Self {
        Self {
            processed_count: 0,
            error_count: 0,
            start_time: Utc::now(),
        }
    }

    pub fn record_success(&mut self) {
        self.processed_count += 1;
    }

    pub fn record_error(&mut self) {
        self.error_count += 1;
    }

    pub fn processed_count(&self) -> u64 {
        self.processed_count
    }

    pub fn error_count(&self) -> u64 {
        self.error_count
    }

    /// Captures the counters together with derived uptime and success rate.
    pub fn snapshot(&self) -> StatsSnapshot {
        let total = self.processed_count + self.error_count;
        let success_rate = if total > 0 {
            self.processed_count as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        StatsSnapshot {
            processed_count: self.processed_count,
            error_count: self.error_count,
            uptime_seconds: (Utc::now() - self.start_time).as_seconds_f64(),
            success_rate,
        }
    }
}

impl Default for WorkerStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view of the worker counters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsSnapshot {
    pub processed_count: u64,
    pub error_count: u64,
    pub uptime_seconds: f64,
    pub success_rate: f64,
}

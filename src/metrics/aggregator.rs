use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::{Outcome, Sample};

/// Running totals for a load test.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatorState {
    pub total_requests: u64,
    pub error_count: u64,
    /// One entry per attempt, in recording order.
    pub latencies: Vec<Duration>,
    /// Issue offsets, index-aligned with `latencies`.
    pub offsets: Vec<Duration>,
    pub status_codes: BTreeMap<u16, u64>,
    pub errors: BTreeMap<String, u64>,
}

impl AggregatorState {
    #[must_use]
    pub const fn successes(&self) -> u64 {
        self.total_requests.saturating_sub(self.error_count)
    }

    pub fn apply(&mut self, sample: Sample) {
        let Sample {
            offset,
            latency,
            outcome,
        } = sample;

        self.total_requests = self.total_requests.saturating_add(1);
        self.latencies.push(latency);
        self.offsets.push(offset);

        if let Some(status) = outcome.status() {
            let count = self.status_codes.entry(status).or_insert(0);
            *count = count.saturating_add(1);
        }

        let error_key = match outcome {
            Outcome::Success { .. } => None,
            Outcome::HttpError { reason, .. } => Some(reason),
            Outcome::TransportError { message } => Some(message),
        };
        if let Some(key) = error_key {
            self.error_count = self.error_count.saturating_add(1);
            let count = self.errors.entry(key).or_insert(0);
            *count = count.saturating_add(1);
        }
    }
}

/// Shared accumulator fed by every worker.
///
/// All fields sit behind one mutex so a sample's effects land together. The
/// guard is only ever held for the in-memory update, never across I/O.
#[derive(Debug, Default)]
pub struct Aggregator {
    state: Mutex<AggregatorState>,
}

impl Aggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, sample: Sample) {
        self.lock().apply(sample);
    }

    /// Copy of the current state. Only consistent once every worker has
    /// been joined.
    #[must_use]
    pub fn snapshot(&self) -> AggregatorState {
        self.lock().clone()
    }

    // `apply` never panics mid-update, so a poisoned guard still holds a
    // consistent state.
    fn lock(&self) -> MutexGuard<'_, AggregatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

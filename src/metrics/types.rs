use std::collections::BTreeMap;
use std::time::Duration;

use tokio::time::Instant;

/// Status codes at or above this value count as application-level errors.
pub const ERROR_STATUS_THRESHOLD: u16 = 400;

/// How a single request attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success { status: u16 },
    /// A response arrived with a status >= 400. `reason` is the canonical
    /// status line (e.g. `500 Internal Server Error`) used as the error key.
    HttpError { status: u16, reason: String },
    /// The call failed before a complete response was read.
    TransportError { message: String },
}

impl Outcome {
    #[must_use]
    pub fn from_status(status: u16, reason: String) -> Self {
        if status >= ERROR_STATUS_THRESHOLD {
            Outcome::HttpError { status, reason }
        } else {
            Outcome::Success { status }
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        !matches!(self, Outcome::Success { .. })
    }

    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Outcome::Success { status } | Outcome::HttpError { status, .. } => Some(*status),
            Outcome::TransportError { .. } => None,
        }
    }
}

/// The recorded outcome of one request attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// Time from run start to the moment the request was issued.
    pub offset: Duration,
    pub latency: Duration,
    pub outcome: Outcome,
}

impl Sample {
    /// Builds a sample whose latency ends now.
    #[must_use]
    pub fn new(run_start: Instant, request_start: Instant, outcome: Outcome) -> Self {
        Self {
            offset: request_start.duration_since(run_start),
            latency: request_start.elapsed(),
            outcome,
        }
    }

    #[must_use]
    pub const fn from_parts(offset: Duration, latency: Duration, outcome: Outcome) -> Self {
        Self {
            offset,
            latency,
            outcome,
        }
    }
}

/// Final statistics for a run. Produced once by [`super::compute`] and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub duration: Duration,
    pub total_requests: u64,
    pub error_count: u64,
    /// Requests per second over `duration`.
    pub throughput: f64,
    /// Percentage of attempts that failed, `0.0` when nothing was sent.
    pub error_rate: f64,
    pub avg_latency: Duration,
    pub min_latency: Duration,
    pub max_latency: Duration,
    pub p90: Duration,
    pub p95: Duration,
    pub p99: Duration,
    /// Sorted latencies in milliseconds.
    pub latency_series_ms: Vec<f64>,
    /// Requests issued in each one-second bucket of the run.
    pub throughput_series: Vec<u64>,
    pub status_codes: BTreeMap<u16, u64>,
    pub errors: BTreeMap<String, u64>,
    /// Set when the run ended on a shutdown signal instead of the deadline.
    pub interrupted: bool,
}

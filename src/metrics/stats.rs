use std::time::Duration;

use super::{AggregatorState, Metrics};

/// Percentile labels reported in [`Metrics`].
const PERCENTILE_P90: u64 = 90;
const PERCENTILE_P95: u64 = 95;
const PERCENTILE_P99: u64 = 99;
const PERCENT_DIVISOR: u64 = 100;
const BUCKET_WIDTH: Duration = Duration::from_secs(1);
const NANOS_PER_MILLI: f64 = 1_000_000.0;
const PERCENT_SCALE: f64 = 100.0;

/// Derives the final statistics for a run.
///
/// The input is left untouched: latencies are sorted in a private copy, so
/// calling this twice on the same state yields identical results.
#[must_use]
pub fn compute(state: &AggregatorState, duration: Duration) -> Metrics {
    let mut sorted = state.latencies.clone();
    sorted.sort_unstable();

    Metrics {
        duration,
        total_requests: state.total_requests,
        error_count: state.error_count,
        throughput: throughput(state.total_requests, duration),
        error_rate: error_rate(state.error_count, state.total_requests),
        avg_latency: average(&sorted),
        min_latency: sorted.first().copied().unwrap_or_default(),
        max_latency: sorted.last().copied().unwrap_or_default(),
        p90: percentile(&sorted, PERCENTILE_P90),
        p95: percentile(&sorted, PERCENTILE_P95),
        p99: percentile(&sorted, PERCENTILE_P99),
        latency_series_ms: sorted.iter().map(|latency| to_millis(*latency)).collect(),
        throughput_series: throughput_series(&state.offsets, duration),
        status_codes: state.status_codes.clone(),
        errors: state.errors.clone(),
        interrupted: false,
    }
}

/// Index of the `percent`-th percentile in a sorted slice of `len` values:
/// `floor(len * percent / 100)`, clamped so it never reaches `len`.
#[must_use]
pub fn percentile_index(len: usize, percent: u64) -> Option<usize> {
    let last = len.checked_sub(1)?;
    let len_u64 = u64::try_from(len).unwrap_or(u64::MAX);
    let raw = len_u64
        .saturating_mul(percent)
        .checked_div(PERCENT_DIVISOR)
        .unwrap_or(0);
    let index = usize::try_from(raw).unwrap_or(last);
    Some(index.min(last))
}

/// Value at the `percent`-th percentile of an ascending slice, zero when
/// the slice is empty.
#[must_use]
pub fn percentile(sorted: &[Duration], percent: u64) -> Duration {
    percentile_index(sorted.len(), percent)
        .and_then(|index| sorted.get(index))
        .copied()
        .unwrap_or_default()
}

fn average(latencies: &[Duration]) -> Duration {
    let count = u128::try_from(latencies.len()).unwrap_or(u128::MAX);
    let total_nanos = latencies
        .iter()
        .map(Duration::as_nanos)
        .fold(0u128, u128::saturating_add);
    let avg = total_nanos.checked_div(count).unwrap_or(0);
    Duration::from_nanos(u64::try_from(avg).unwrap_or(u64::MAX))
}

/// Per-second request counts over `[0, duration)`, keyed by issue offset. A
/// trailing partial second gets its own bucket; offsets at or past
/// `duration` are ignored.
#[must_use]
pub fn throughput_series(offsets: &[Duration], duration: Duration) -> Vec<u64> {
    let mut buckets = vec![0u64; bucket_count(duration)];
    for offset in offsets.iter().filter(|offset| **offset < duration) {
        let index = usize::try_from(offset.as_secs()).unwrap_or(usize::MAX);
        if let Some(bucket) = buckets.get_mut(index) {
            *bucket = bucket.saturating_add(1);
        }
    }
    buckets
}

fn bucket_count(duration: Duration) -> usize {
    let width = BUCKET_WIDTH.as_nanos();
    let nanos = duration.as_nanos();
    let whole = nanos.checked_div(width).unwrap_or(0);
    let partial = u128::from(nanos.checked_rem(width).unwrap_or(0) > 0);
    usize::try_from(whole.saturating_add(partial)).unwrap_or(usize::MAX)
}

#[expect(
    clippy::float_arithmetic,
    reason = "rates are reported as fractional values"
)]
fn throughput(total_requests: u64, duration: Duration) -> f64 {
    let secs = duration.as_secs_f64();
    if secs > 0.0 {
        total_requests as f64 / secs
    } else {
        0.0
    }
}

/// `error_count / total_requests * 100`, or `0.0` for an empty run.
#[expect(
    clippy::float_arithmetic,
    reason = "rates are reported as fractional values"
)]
#[must_use]
pub fn error_rate(error_count: u64, total_requests: u64) -> f64 {
    if total_requests == 0 {
        return 0.0;
    }
    error_count as f64 / total_requests as f64 * PERCENT_SCALE
}

#[expect(
    clippy::float_arithmetic,
    reason = "latency series is plotted in fractional milliseconds"
)]
fn to_millis(latency: Duration) -> f64 {
    latency.as_nanos() as f64 / NANOS_PER_MILLI
}

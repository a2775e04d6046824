//! Sample aggregation and the statistics derived from it.
mod aggregator;
mod stats;
mod types;


pub use aggregator::{Aggregator, AggregatorState};
pub use stats::{compute, error_rate, percentile, percentile_index, throughput_series};
pub use types::{ERROR_STATUS_THRESHOLD, Metrics, Outcome, Sample};

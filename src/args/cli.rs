use clap::Parser;
use std::time::Duration;

use super::parsers::{parse_duration_arg, parse_positive_usize};
use super::types::{OutputFormat, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Fixed-concurrency HTTP load tester: sends GET requests for a set duration and reports throughput, error rate, and latency percentiles."
)]
pub struct TesterArgs {
    /// Target URL for the load test
    #[arg(long, short, alias = "endpoint", help_heading = "Common Options")]
    pub url: Option<String>,

    /// Duration of test (supports ms/s/m/h, bare numbers are seconds)
    #[arg(
        long = "duration",
        short = 't',
        default_value = "5s",
        value_parser = parse_duration_arg,
        help_heading = "Common Options"
    )]
    pub target_duration: Duration,

    /// Number of workers issuing requests back-to-back
    #[arg(
        long,
        short = 'c',
        default_value = "4",
        value_parser = parse_positive_usize,
        help_heading = "Common Options"
    )]
    pub concurrency: PositiveUsize,

    /// Request timeout (supports ms/s/m/h)
    #[arg(
        long = "timeout",
        default_value = "10s",
        value_parser = parse_duration_arg
    )]
    pub request_timeout: Duration,

    /// Timeout for establishing a new connection (supports ms/s/m/h)
    #[arg(
        long = "connect-timeout",
        default_value = "5s",
        value_parser = parse_duration_arg
    )]
    pub connect_timeout: Duration,

    /// How often the progress indicator is refreshed (supports ms/s/m/h)
    #[arg(
        long = "progress-interval",
        default_value = "1s",
        value_parser = parse_duration_arg
    )]
    pub progress_interval: Duration,

    /// Path to a TOML or JSON config file (defaults to ./druk.toml or ./druk.json)
    #[arg(long)]
    pub config: Option<String>,

    /// Format of the final report
    #[arg(long = "output-format", value_enum, default_value = "text")]
    pub output_format: OutputFormat,

    /// Do not render the progress indicator
    #[arg(long = "no-progress")]
    pub no_progress: bool,

    /// Disable color output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Enable verbose logging (sets log level to debug unless overridden by DRUK_LOG/RUST_LOG)
    #[arg(long, short = 'v', alias = "debug", help_heading = "Common Options")]
    pub verbose: bool,
}

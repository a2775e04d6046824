use std::collections::BTreeMap;
use std::time::Duration;

use druk::args::OutputFormat;
use druk::error::AppResult;
use druk::metrics::Metrics;
use serde::Serialize;

/// Prints the final report to stdout in the requested format.
pub(crate) fn print_report(metrics: &Metrics, url: &str, format: OutputFormat) -> AppResult<()> {
    match format {
        OutputFormat::Text => {
            for line in render_text_report(metrics, url) {
                println!("{}", line);
            }
        }
        OutputFormat::Json => println!("{}", render_json_report(metrics, url)?),
    }
    Ok(())
}

fn render_text_report(metrics: &Metrics, url: &str) -> Vec<String> {
    let mut lines = vec![
        format!("Target: {}", url),
        format!("Duration: {}", format_duration(metrics.duration)),
        format!("Total Requests: {}", metrics.total_requests),
        format!(
            "Errors: {} ({:.2}%)",
            metrics.error_count, metrics.error_rate
        ),
        format!("Throughput: {:.2} req/s", metrics.throughput),
        format!(
            "Latency avg/min/max: {} / {} / {}",
            format_duration(metrics.avg_latency),
            format_duration(metrics.min_latency),
            format_duration(metrics.max_latency)
        ),
        format!(
            "Latency p90/p95/p99: {} / {} / {}",
            format_duration(metrics.p90),
            format_duration(metrics.p95),
            format_duration(metrics.p99)
        ),
    ];

    if metrics.interrupted {
        lines.push("Interrupted: run stopped before the deadline".to_owned());
    }

    if !metrics.status_codes.is_empty() {
        lines.push("Status Codes:".to_owned());
        for (status, count) in &metrics.status_codes {
            lines.push(format!("  {}: {}", status, count));
        }
    }

    if !metrics.errors.is_empty() {
        lines.push("Error Breakdown:".to_owned());
        for (key, count) in &metrics.errors {
            lines.push(format!("  {}: {}", key, count));
        }
    }

    let series = metrics
        .throughput_series
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    lines.push(format!("Requests per second: [{}]", series));
    lines
}

#[derive(Debug, Serialize)]
struct JsonReport<'report> {
    url: &'report str,
    duration_ms: f64,
    interrupted: bool,
    total_requests: u64,
    error_count: u64,
    throughput_rps: f64,
    error_rate_percent: f64,
    latency_ms: LatencyReport,
    status_codes: &'report BTreeMap<u16, u64>,
    errors: &'report BTreeMap<String, u64>,
    throughput_series: &'report [u64],
}

#[derive(Debug, Serialize)]
struct LatencyReport {
    avg: f64,
    min: f64,
    max: f64,
    p90: f64,
    p95: f64,
    p99: f64,
}

fn render_json_report(metrics: &Metrics, url: &str) -> AppResult<String> {
    let report = JsonReport {
        url,
        duration_ms: millis(metrics.duration),
        interrupted: metrics.interrupted,
        total_requests: metrics.total_requests,
        error_count: metrics.error_count,
        throughput_rps: metrics.throughput,
        error_rate_percent: metrics.error_rate,
        latency_ms: LatencyReport {
            avg: millis(metrics.avg_latency),
            min: millis(metrics.min_latency),
            max: millis(metrics.max_latency),
            p90: millis(metrics.p90),
            p95: millis(metrics.p95),
            p99: millis(metrics.p99),
        },
        status_codes: &metrics.status_codes,
        errors: &metrics.errors,
        throughput_series: &metrics.throughput_series,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

#[expect(clippy::float_arithmetic, reason = "JSON reports fractional milliseconds")]
fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1_000.0
}

/// `12.345ms` below one second, `1.500s` above.
fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();
    if micros < 1_000_000 {
        format!(
            "{}.{:03}ms",
            micros.checked_div(1_000).unwrap_or(0),
            micros.checked_rem(1_000).unwrap_or(0)
        )
    } else {
        let millis = duration.as_millis();
        format!(
            "{}.{:03}s",
            millis.checked_div(1_000).unwrap_or(0),
            millis.checked_rem(1_000).unwrap_or(0)
        )
    }
}

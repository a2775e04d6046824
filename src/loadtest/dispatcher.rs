use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::info;

use crate::error::{AppError, AppResult, ValidationError};
use crate::http::build_client;
use crate::metrics::{Aggregator, AggregatorState, Metrics, compute};
use crate::shutdown::{ShutdownReceiver, ShutdownSender, shutdown_pending};

use super::progress::{ProgressEvent, ProgressSender, report_progress};
use super::settings::RunSettings;
use super::worker::{WorkerContext, run_worker};

/// Runs one load test against a single endpoint. Holds validated settings and
/// the client every worker shares.
#[derive(Debug)]
pub struct Dispatcher {
    settings: RunSettings,
    client: Client,
}

impl Dispatcher {
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(settings: RunSettings) -> AppResult<Self> {
        let client = build_client(
            settings.request_timeout,
            settings.connect_timeout,
            settings.concurrency,
        )?;
        Ok(Self { settings, client })
    }

    #[must_use]
    pub const fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// Starts the workers and the progress reporter, waits for every worker
    /// and returns the computed metrics.
    ///
    /// Request failures never fail the run; they are counted in the result.
    /// A shutdown signal stops the workers early and marks the result as
    /// interrupted. `shutdown_rx` should be subscribed before the dispatcher
    /// is built so a signal sent in between is not missed.
    ///
    /// # Errors
    ///
    /// Returns an error when the deadline cannot be represented or a worker
    /// task panics.
    pub async fn run(
        self,
        progress_tx: Option<ProgressSender>,
        mut shutdown_rx: ShutdownReceiver,
    ) -> AppResult<Metrics> {
        let Self { settings, client } = self;

        // Taken before the pending check so a later signal reaches every task.
        let reporter_rx = shutdown_rx.resubscribe();
        let worker_rxs: Vec<ShutdownReceiver> = (0..settings.concurrency)
            .map(|_worker| shutdown_rx.resubscribe())
            .collect();

        if shutdown_pending(&mut shutdown_rx) {
            info!("Shutdown requested before the load test started");
            if let Some(progress_tx) = progress_tx {
                drop(tokio::spawn(async move {
                    drop(progress_tx.send(ProgressEvent::Done).await);
                }));
            }
            return Ok(Metrics {
                interrupted: true,
                ..compute(&AggregatorState::default(), Duration::ZERO)
            });
        }

        let run_start = Instant::now();
        let deadline = run_start
            .checked_add(settings.duration)
            .ok_or(AppError::Validation(ValidationError::DurationOverflow))?;
        let aggregator = Arc::new(Aggregator::new());

        info!(
            url = %settings.url,
            concurrency = settings.concurrency,
            duration = ?settings.duration,
            "Starting load test"
        );

        if let Some(progress_tx) = progress_tx {
            drop(tokio::spawn(report_progress(
                progress_tx,
                run_start,
                deadline,
                settings.progress_interval,
                reporter_rx,
            )));
        }

        let context = WorkerContext {
            client,
            url: settings.url.clone(),
            aggregator: Arc::clone(&aggregator),
            run_start,
            deadline,
        };
        let handles: Vec<JoinHandle<u64>> = worker_rxs
            .into_iter()
            .enumerate()
            .map(|(worker_id, worker_rx)| {
                tokio::spawn(run_worker(worker_id, context.clone(), worker_rx))
            })
            .collect();
        drop(context);

        for handle in handles {
            handle.await?;
        }

        let interrupted = shutdown_pending(&mut shutdown_rx);
        let elapsed = run_start.elapsed();
        let effective_duration = if interrupted {
            elapsed.min(settings.duration)
        } else {
            settings.duration
        };

        let state = aggregator.snapshot();
        let metrics = Metrics {
            interrupted,
            ..compute(&state, effective_duration)
        };

        info!(
            total_requests = metrics.total_requests,
            errors = metrics.error_count,
            elapsed = ?elapsed,
            interrupted,
            "Load test finished"
        );
        Ok(metrics)
    }
}

/// Validates the inputs and runs a load test with default timeouts.
///
/// # Errors
///
/// Returns a validation error for a malformed endpoint, a zero duration or a
/// zero concurrency, and an HTTP error when the client cannot be built.
pub async fn run(
    endpoint: &str,
    duration: Duration,
    concurrency: usize,
    progress_tx: Option<ProgressSender>,
    shutdown_tx: &ShutdownSender,
) -> AppResult<Metrics> {
    let shutdown_rx = shutdown_tx.subscribe();
    let settings = RunSettings::new(endpoint, duration, concurrency)?;
    Dispatcher::new(settings)?.run(progress_tx, shutdown_rx).await
}

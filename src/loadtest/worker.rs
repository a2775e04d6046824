use std::sync::Arc;

use reqwest::{Client, Url};
use tokio::time::Instant;
use tracing::debug;

use crate::http::execute_get;
use crate::metrics::{Aggregator, Outcome, Sample};
use crate::shutdown::{ShutdownReceiver, wait_for_shutdown};

/// State shared by every worker of one run.
#[derive(Debug, Clone)]
pub(super) struct WorkerContext {
    pub client: Client,
    pub url: Url,
    pub aggregator: Arc<Aggregator>,
    pub run_start: Instant,
    pub deadline: Instant,
}

/// Issues requests back to back until the deadline passes or shutdown is
/// signalled. Returns the number of samples this worker recorded.
///
/// The deadline is only checked between requests, so the last request may
/// finish after it. On shutdown the in-flight request is dropped and not
/// recorded.
pub(super) async fn run_worker(
    worker_id: usize,
    context: WorkerContext,
    mut shutdown_rx: ShutdownReceiver,
) -> u64 {
    let mut recorded: u64 = 0;
    let mut logged_transport_error = false;

    loop {
        let request_start = Instant::now();
        if request_start >= context.deadline {
            break;
        }

        let outcome = tokio::select! {
            () = wait_for_shutdown(&mut shutdown_rx) => break,
            outcome = execute_get(&context.client, &context.url) => outcome,
        };

        if !logged_transport_error && let Outcome::TransportError { message } = &outcome {
            debug!(worker_id, error = %message, "Request failed before a response");
            logged_transport_error = true;
        }

        context
            .aggregator
            .record(Sample::new(context.run_start, request_start, outcome));
        recorded = recorded.saturating_add(1);
    }

    recorded
}

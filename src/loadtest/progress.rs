use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::time::{Instant, MissedTickBehavior};

use crate::shutdown::{ShutdownReceiver, wait_for_shutdown};

/// Buffered progress events. One slot keeps the stream fresh: a tick that
/// finds the slot taken is dropped.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 1;

/// One message on the progress stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProgressEvent {
    /// Elapsed fraction of the run, within `[0, 1]`.
    Tick(f64),
    /// Sent once when the run stops. Nothing follows it.
    Done,
}

pub type ProgressSender = mpsc::Sender<ProgressEvent>;
pub type ProgressReceiver = mpsc::Receiver<ProgressEvent>;

#[must_use]
pub fn progress_channel() -> (ProgressSender, ProgressReceiver) {
    mpsc::channel(PROGRESS_CHANNEL_CAPACITY)
}

/// Publishes the elapsed fraction every `interval` until the deadline or a
/// shutdown, then sends [`ProgressEvent::Done`] and drops the sender.
pub(super) async fn report_progress(
    progress_tx: ProgressSender,
    run_start: Instant,
    deadline: Instant,
    interval: Duration,
    mut shutdown_rx: ShutdownReceiver,
) {
    let duration = deadline.duration_since(run_start);
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let deadline_reached = tokio::time::sleep_until(deadline);
    tokio::pin!(deadline_reached);

    loop {
        tokio::select! {
            () = wait_for_shutdown(&mut shutdown_rx) => break,
            () = &mut deadline_reached => break,
            _ = ticker.tick() => {
                let elapsed = run_start.elapsed();
                if elapsed >= duration {
                    break;
                }
                match progress_tx.try_send(ProgressEvent::Tick(elapsed_fraction(elapsed, duration))) {
                    Ok(()) | Err(TrySendError::Full(_)) => {}
                    Err(TrySendError::Closed(_)) => return,
                }
            }
        }
    }

    if progress_tx.send(ProgressEvent::Done).await.is_err() {
        tracing::debug!("Progress consumer went away before completion.");
    }
}

/// `elapsed / duration`, clamped to `[0, 1]`.
#[expect(
    clippy::float_arithmetic,
    reason = "progress is reported as a fraction"
)]
#[must_use]
pub(super) fn elapsed_fraction(elapsed: Duration, duration: Duration) -> f64 {
    let total = duration.as_secs_f64();
    if total <= 0.0 {
        return 1.0;
    }
    (elapsed.as_secs_f64() / total).clamp(0.0, 1.0)
}

use std::io::{IsTerminal, Write};
use std::time::Duration;

use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use druk::loadtest::{ProgressEvent, ProgressReceiver};

/// Width of the bar between the brackets.
const BAR_WIDTH: usize = 30;
/// Fixed-point scale for the completed fraction (two decimals of a percent).
const FRACTION_SCALE: u64 = 10_000;

/// Consumes the progress stream until it ends. The bar is only drawn when
/// stderr is a terminal; otherwise events are drained and discarded.
pub(crate) fn spawn_progress_renderer(
    mut progress_rx: ProgressReceiver,
    duration: Duration,
    no_color: bool,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let interactive = std::io::stderr().is_terminal();
        let style = ProgressStyle::new(BAR_WIDTH);
        let mut drew_line = false;

        while let Some(event) = progress_rx.recv().await {
            match event {
                ProgressEvent::Tick(fraction) => {
                    if !interactive {
                        continue;
                    }
                    let scaled = scale_fraction(fraction);
                    if render_progress_line(&style, scaled, duration, no_color).is_err() {
                        break;
                    }
                    drew_line = true;
                }
                ProgressEvent::Done => break,
            }
        }

        if drew_line {
            drop(finish_progress_line());
        }
    })
}

#[expect(
    clippy::float_arithmetic,
    reason = "converts the reported fraction to fixed point once"
)]
fn scale_fraction(fraction: f64) -> u64 {
    let scaled = (fraction.clamp(0.0, 1.0) * 10_000.0).round();
    (scaled as u64).min(FRACTION_SCALE)
}

fn render_progress_line(
    style: &ProgressStyle,
    scaled: u64,
    duration: Duration,
    no_color: bool,
) -> Result<(), std::io::Error> {
    let line = build_progress_line(style, scaled, duration, no_color);

    let mut out = std::io::stderr();
    queue!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine))?;
    for segment in line {
        if let Some(color) = segment.color {
            queue!(
                out,
                SetForegroundColor(color),
                Print(&segment.text),
                ResetColor
            )?;
        } else {
            queue!(out, Print(&segment.text))?;
        }
    }
    out.flush()?;
    Ok(())
}

fn finish_progress_line() -> Result<(), std::io::Error> {
    let mut out = std::io::stderr();
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

fn build_progress_line(
    style: &ProgressStyle,
    scaled: u64,
    duration: Duration,
    no_color: bool,
) -> Vec<ProgressSegment> {
    let size = style.size.max(1);
    let scaled = scaled.min(FRACTION_SCALE);

    let size_u64 = u64::try_from(size).unwrap_or(u64::MAX);
    let filled = scaled
        .saturating_mul(size_u64)
        .checked_div(FRACTION_SCALE)
        .unwrap_or(0);
    let complete_size = usize::try_from(filled).unwrap_or(size).min(size);
    let incomplete_size = size.saturating_sub(complete_size);

    let percent_whole = scaled.checked_div(100).unwrap_or(0);
    let percent_frac = scaled.checked_rem(100).unwrap_or(0);
    let percent_text = format!(" {}.{:02}%", percent_whole, percent_frac);

    let total_tenths = duration.as_millis().checked_div(100).unwrap_or(0);
    let elapsed_tenths = total_tenths
        .saturating_mul(u128::from(scaled))
        .checked_div(u128::from(FRACTION_SCALE))
        .unwrap_or(0);
    let time_text = format!(
        " | {}.{}s / {}.{}s",
        elapsed_tenths.checked_div(10).unwrap_or(0),
        elapsed_tenths.checked_rem(10).unwrap_or(0),
        total_tenths.checked_div(10).unwrap_or(0),
        total_tenths.checked_rem(10).unwrap_or(0),
    );

    let progress_bar = format!(
        "{}{}{}{}",
        style.begin,
        style.fill.repeat(complete_size),
        style.empty.repeat(incomplete_size),
        style.end
    );

    if no_color {
        vec![
            ProgressSegment::plain(progress_bar),
            ProgressSegment::plain(percent_text),
            ProgressSegment::plain(time_text),
        ]
    } else {
        vec![
            ProgressSegment::plain(progress_bar),
            ProgressSegment::colored(percent_text, Color::Cyan),
            ProgressSegment::colored(time_text, Color::Yellow),
        ]
    }
}

struct ProgressStyle {
    size: usize,
    begin: &'static str,
    end: &'static str,
    fill: &'static str,
    empty: &'static str,
}

impl ProgressStyle {
    const fn new(size: usize) -> Self {
        Self {
            size,
            begin: "[",
            end: "]",
            fill: "#",
            empty: "-",
        }
    }
}

struct ProgressSegment {
    text: String,
    color: Option<Color>,
}

impl ProgressSegment {
    const fn plain(text: String) -> Self {
        Self { text, color: None }
    }

    const fn colored(text: String, color: Color) -> Self {
        Self {
            text,
            color: Some(color),
        }
    }
}

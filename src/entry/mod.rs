use std::ffi::OsString;
use std::path::Path;

use clap::{ArgMatches, CommandFactory, FromArgMatches};
use druk::args::TesterArgs;
use druk::config::{DEFAULT_CONFIG_FILES, apply_config, load_config};
use druk::error::{AppError, AppResult, ValidationError};
use druk::loadtest::{Dispatcher, RunSettings, progress_channel};
use druk::metrics::Metrics;
use druk::shutdown::shutdown_channel;

use crate::app::{print_report, spawn_progress_renderer};
use crate::system::logger::init_logging;
use crate::system::shutdown_handlers::setup_signal_shutdown_handler;

pub(crate) fn run() -> AppResult<()> {
    let Some((mut args, matches)) = parse_args()? else {
        return Ok(());
    };

    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, &matches, &config)?;
    }

    init_logging(args.verbose, args.no_color);

    let settings = RunSettings::try_from(&args)?;
    let url = settings.url.to_string();
    tracing::debug!(
        url = %url,
        output_format = args.output_format.as_str(),
        progress = !args.no_progress,
        "Resolved run settings"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::validation(ValidationError::RuntimeBuildFailed { source: err }))?;

    let metrics = runtime.block_on(run_async(settings, &args))?;
    print_report(&metrics, &url, args.output_format)
}

fn parse_args() -> AppResult<Option<(TesterArgs, ArgMatches)>> {
    let mut cmd = TesterArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = TesterArgs::from_arg_matches(&matches)?;

    Ok(Some((args, matches)))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    !has_default_config()
}

fn has_default_config() -> bool {
    DEFAULT_CONFIG_FILES
        .iter()
        .any(|path| Path::new(path).exists())
}

async fn run_async(settings: RunSettings, args: &TesterArgs) -> AppResult<Metrics> {
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);
    let duration = settings.duration;
    let dispatcher = Dispatcher::new(settings)?;

    let (progress_tx, renderer) = if args.no_progress {
        (None, None)
    } else {
        let (progress_tx, progress_rx) = progress_channel();
        let renderer = spawn_progress_renderer(progress_rx, duration, args.no_color);
        (Some(progress_tx), Some(renderer))
    };

    let result = dispatcher.run(progress_tx, shutdown_rx).await;

    // Releases the signal task and any reporter still waiting on the deadline.
    drop(shutdown_tx.send(()));
    signal_handle.await?;
    if let Some(renderer) = renderer {
        renderer.await?;
    }

    result
}

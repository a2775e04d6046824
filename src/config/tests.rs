use super::{
    apply_config, load_config, load_config_file,
    types::{ConfigFile, DurationValue},
};
use clap::{CommandFactory, FromArgMatches};
use std::time::Duration;
use tempfile::tempdir;

use crate::args::{OutputFormat, TesterArgs};
use crate::error::{AppError, AppResult, ConfigError};

fn write_config(name: &str, content: &str) -> AppResult<(tempfile::TempDir, std::path::PathBuf)> {
    let dir = tempdir()?;
    let path = dir.path().join(name);
    std::fs::write(&path, content)?;
    Ok((dir, path))
}

fn args_from(cli: &[&str]) -> AppResult<(TesterArgs, clap::ArgMatches)> {
    let matches = TesterArgs::command().try_get_matches_from(cli)?;
    let args = TesterArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

#[test]
fn parse_toml_config() -> AppResult<()> {
    let (_dir, path) = write_config(
        "druk.toml",
        r#"
url = "http://localhost:3000"
duration = "2m"
concurrency = 12
timeout = 3
output_format = "json"
"#,
    )?;

    let config = load_config_file(&path)?;
    if config.url.as_deref() != Some("http://localhost:3000") {
        return Err(AppError::config("Unexpected url"));
    }
    if config.duration != Some(DurationValue::Text("2m".to_owned())) {
        return Err(AppError::config("Unexpected duration"));
    }
    if config.timeout != Some(DurationValue::Seconds(3)) {
        return Err(AppError::config("Unexpected timeout"));
    }
    if config.concurrency != Some(12) || config.output_format != Some(OutputFormat::Json) {
        return Err(AppError::config("Unexpected concurrency/output_format"));
    }
    Ok(())
}

#[test]
fn parse_json_config_with_endpoint_alias() -> AppResult<()> {
    let (_dir, path) = write_config(
        "druk.json",
        r#"{
  "endpoint": "http://localhost:3000/ping",
  "duration": 10,
  "no_progress": true
}"#,
    )?;

    let config = load_config(path.to_str())?.unwrap_or_default();
    if config.url.as_deref() != Some("http://localhost:3000/ping") {
        return Err(AppError::config("Endpoint alias not applied"));
    }
    if config.duration != Some(DurationValue::Seconds(10)) || config.no_progress != Some(true) {
        return Err(AppError::config("Unexpected duration/no_progress"));
    }
    Ok(())
}

#[test]
fn load_config_rejects_unknown_extension() -> AppResult<()> {
    let (_dir, path) = write_config("druk.yaml", "url: http://localhost")?;
    match load_config_file(&path) {
        Err(AppError::Config(ConfigError::UnsupportedExtension { ext })) if ext == "yaml" => Ok(()),
        other => Err(AppError::config(format!(
            "Expected unsupported extension, got {:?}",
            other.map(|_| ())
        ))),
    }
}

#[test]
fn load_config_rejects_unknown_fields() -> AppResult<()> {
    let (_dir, path) = write_config("druk.toml", "method = \"post\"\n")?;
    match load_config_file(&path) {
        Err(AppError::Config(ConfigError::ParseToml { .. })) => Ok(()),
        other => Err(AppError::config(format!(
            "Expected TOML parse error, got {:?}",
            other.map(|_| ())
        ))),
    }
}

#[test]
fn apply_config_fills_unset_options() -> AppResult<()> {
    let config = ConfigFile {
        url: Some("http://localhost:3000".to_owned()),
        duration: Some(DurationValue::Text("1500ms".to_owned())),
        concurrency: Some(8),
        timeout: Some(DurationValue::Seconds(2)),
        connect_timeout: Some(DurationValue::Text("750ms".to_owned())),
        progress_interval: Some(DurationValue::Text("250ms".to_owned())),
        output_format: Some(OutputFormat::Json),
        no_progress: Some(true),
        no_color: Some(true),
        verbose: Some(true),
    };
    let (mut args, matches) = args_from(&["druk"])?;
    apply_config(&mut args, &matches, &config)?;

    let checks = [
        (
            args.url.as_deref() == Some("http://localhost:3000"),
            "Unexpected url",
        ),
        (
            args.target_duration == Duration::from_millis(1500),
            "Unexpected duration",
        ),
        (args.concurrency.get() == 8, "Unexpected concurrency"),
        (
            args.request_timeout == Duration::from_secs(2),
            "Unexpected timeout",
        ),
        (
            args.connect_timeout == Duration::from_millis(750),
            "Unexpected connect_timeout",
        ),
        (
            args.progress_interval == Duration::from_millis(250),
            "Unexpected progress_interval",
        ),
        (
            args.output_format == OutputFormat::Json,
            "Unexpected output_format",
        ),
        (
            args.no_progress && args.no_color && args.verbose,
            "Unexpected flags",
        ),
    ];
    for (ok, message) in checks {
        if !ok {
            return Err(AppError::config(message));
        }
    }
    Ok(())
}

#[test]
fn apply_config_keeps_cli_values() -> AppResult<()> {
    let config = ConfigFile {
        url: Some("http://config.local".to_owned()),
        duration: Some(DurationValue::Seconds(60)),
        concurrency: Some(99),
        ..ConfigFile::default()
    };
    let (mut args, matches) = args_from(&["druk", "-u", "http://cli.local", "-c", "2"])?;
    apply_config(&mut args, &matches, &config)?;

    if args.url.as_deref() != Some("http://cli.local") {
        return Err(AppError::config("CLI url must win"));
    }
    if args.concurrency.get() != 2 {
        return Err(AppError::config("CLI concurrency must win"));
    }
    if args.target_duration != Duration::from_secs(60) {
        return Err(AppError::config("Config duration should fill the default"));
    }
    Ok(())
}

#[test]
fn apply_config_rejects_zero_values() -> AppResult<()> {
    let (mut args, matches) = args_from(&["druk"])?;
    let zero_concurrency = ConfigFile {
        concurrency: Some(0),
        ..ConfigFile::default()
    };
    match apply_config(&mut args, &matches, &zero_concurrency) {
        Err(AppError::Config(ConfigError::FieldMustBePositive { field, .. }))
            if field == "concurrency" => {}
        other => {
            return Err(AppError::config(format!(
                "Expected FieldMustBePositive, got {:?}",
                other
            )));
        }
    }

    let zero_duration = ConfigFile {
        duration: Some(DurationValue::Seconds(0)),
        ..ConfigFile::default()
    };
    match apply_config(&mut args, &matches, &zero_duration) {
        Err(AppError::Config(ConfigError::InvalidDuration { field, .. })) if field == "duration" => {
            Ok(())
        }
        other => Err(AppError::config(format!(
            "Expected InvalidDuration, got {:?}",
            other
        ))),
    }
}

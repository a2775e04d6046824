use std::time::Duration;

use url::Url;

use crate::args::TesterArgs;
use crate::error::{AppError, AppResult, ValidationError};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(1);
/// Lower bound for the progress tick so the reporter never spins.
const MIN_PROGRESS_INTERVAL: Duration = Duration::from_millis(10);

/// Validated inputs for one load test run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub url: Url,
    pub duration: Duration,
    pub concurrency: usize,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub progress_interval: Duration,
}

impl RunSettings {
    /// Validates the three core inputs and fills the rest with defaults.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the endpoint is not an absolute
    /// `http`/`https` URL with a host, the duration is zero, or the
    /// concurrency is zero.
    pub fn new(endpoint: &str, duration: Duration, concurrency: usize) -> AppResult<Self> {
        let url = parse_endpoint(endpoint)?;
        if duration.is_zero() {
            return Err(AppError::validation(ValidationError::DurationZero));
        }
        if concurrency == 0 {
            return Err(AppError::validation(ValidationError::ValueTooSmall { min: 1 }));
        }
        Ok(Self {
            url,
            duration,
            concurrency,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        })
    }

    #[must_use]
    pub const fn with_timeouts(mut self, request_timeout: Duration, connect_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self.connect_timeout = connect_timeout;
        self
    }

    #[must_use]
    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval.max(MIN_PROGRESS_INTERVAL);
        self
    }
}

impl TryFrom<&TesterArgs> for RunSettings {
    type Error = AppError;

    fn try_from(args: &TesterArgs) -> AppResult<Self> {
        let url = args
            .url
            .as_deref()
            .ok_or(AppError::Validation(ValidationError::MissingUrl))?;
        Ok(
            Self::new(url, args.target_duration, args.concurrency.get())?
                .with_timeouts(args.request_timeout, args.connect_timeout)
                .with_progress_interval(args.progress_interval),
        )
    }
}

/// Parses an endpoint into an absolute `http`/`https` URL with a host.
///
/// # Errors
///
/// Returns an error when the URL is malformed, uses another scheme, or has no
/// host.
pub fn parse_endpoint(endpoint: &str) -> Result<Url, ValidationError> {
    let trimmed = endpoint.trim();
    let url = Url::parse(trimmed).map_err(|err| ValidationError::InvalidUrl {
        url: trimmed.to_owned(),
        source: err,
    })?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ValidationError::UnsupportedScheme {
                scheme: other.to_owned(),
            });
        }
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ValidationError::UrlMissingHost);
    }
    Ok(url)
}

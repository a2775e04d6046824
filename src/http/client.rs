use std::time::Duration;

use reqwest::{Client, redirect};

use crate::error::{AppError, AppResult, HttpError};

/// Redirects followed before a response is treated as final.
const REDIRECT_LIMIT: usize = 10;

/// Builds the client shared by every worker.
///
/// The idle pool is sized to the worker count so each worker can keep its
/// connection alive between iterations.
///
/// # Errors
///
/// Returns an error when the underlying TLS backend or connector cannot be
/// initialised.
pub fn build_client(
    request_timeout: Duration,
    connect_timeout: Duration,
    max_idle_per_host: usize,
) -> AppResult<Client> {
    Client::builder()
        .timeout(request_timeout)
        .connect_timeout(connect_timeout)
        .redirect(redirect::Policy::limited(REDIRECT_LIMIT))
        .pool_max_idle_per_host(max_idle_per_host)
        .build()
        .map_err(|err| AppError::http(HttpError::BuildClientFailed { source: err }))
}

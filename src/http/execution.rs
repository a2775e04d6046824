use std::error::Error as _;

use futures_util::StreamExt;
use reqwest::{Client, Url};

use crate::metrics::Outcome;

/// Issues one GET and reads the body to the end.
///
/// The response is consumed before returning so its connection goes back to
/// the pool for the next iteration.
pub async fn execute_get(client: &Client, url: &Url) -> Outcome {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(err) => {
            return Outcome::TransportError {
                message: describe_error(&err),
            };
        }
    };

    let status = response.status();
    match drain_response_body(response).await {
        Ok(_) => Outcome::from_status(status.as_u16(), status.to_string()),
        Err(err) => Outcome::TransportError {
            message: describe_error(&err),
        },
    }
}

/// Flattens an error and its sources into one line, e.g.
/// `error sending request: tcp connect error: Connection refused`.
#[must_use]
pub fn describe_error(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

async fn drain_response_body(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}

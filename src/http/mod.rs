//! HTTP client construction and single-request execution.
mod client;
mod execution;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::build_client;
pub use execution::{describe_error, execute_get};

//! Core library for the `druk` CLI.
//!
//! This crate provides the building blocks used by the binary: CLI argument
//! types, configuration parsing, request execution, the load dispatcher, and
//! metrics aggregation. [`loadtest::run`] is the entry point for driving a
//! test from code; it returns a [`metrics::Metrics`] snapshot once every
//! worker has stopped.
pub mod args;
pub mod config;
pub mod error;
pub mod http;
pub mod loadtest;
pub mod metrics;
pub mod shutdown;

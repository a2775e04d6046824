//! CLI argument types and parsing helpers.
mod cli;
pub(crate) mod parsers;
mod types;

#[cfg(test)]
mod test_support;

pub use cli::TesterArgs;
pub use parsers::parse_duration_value;
pub use types::{OutputFormat, PositiveUsize};

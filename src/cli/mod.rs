//! Command-line interface for lastfm-provider.
//!
//! Loads the configuration, builds the client exactly as an embedding
//! application would, and reports on or exercises the result.

mod commands;

pub use commands::{Cli, Commands, run_command};

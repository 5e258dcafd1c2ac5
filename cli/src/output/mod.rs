//! CLI-specific output implementations
//!
//! Terminal rendering for agent events. Everything here writes to stderr.

pub mod cli_handler;

pub use cli_handler::{CliOutputConfig, CliOutputHandler};

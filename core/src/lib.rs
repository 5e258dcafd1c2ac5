//! # SkillAgent Core
//!
//! Core library for SkillAgent, a zero-shot ReAct agent that answers
//! questions by reasoning over a small set of text tools.
//!
//! The library provides the agent loop, an OpenAI-compatible chat client,
//! the tool registry and the event stream used to trace a run.

// Core modules
pub mod agent;
pub mod config;
pub mod error;
pub mod llm;
pub mod output;
pub mod tools;

// Re-export commonly used types
pub use agent::{Agent, AgentBuilder, AgentConfig, AgentExecution, ZeroShotAgent};
pub use config::{ModelParams, Protocol, ResolvedLlmConfig};
pub use error::{Error, Result};
pub use tools::{EchoTool, Tool, ToolExecutor, ToolRegistry};

/// Current version of the skillagent-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing with a specific debug mode.
///
/// Logs go to stderr so stdout stays reserved for the agent's answer.
pub fn init_tracing_with_debug(debug: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter(debug))),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Log level used when `RUST_LOG` is not set
fn default_filter(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info"
    }
}

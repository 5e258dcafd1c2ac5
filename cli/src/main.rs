//! # skillagent CLI
//!
//! Command-line interface for SkillAgent, a zero-shot ReAct agent with an
//! echo tool.
//!
//! ## Usage
//!
//! - `skillagent` - Ask the default question
//! - `skillagent "question"` - Ask your own question
//! - `skillagent tools` - Show available tools
//!
//! The answer is printed on stdout as a single `Agent response: ...` line.
//! Logs and the `--verbose` reasoning trace go to stderr.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod output;

use commands::run::DEFAULT_QUESTION;
use commands::{run_command, tools_command};
use config::CliConfigLoader;

/// skillagent - Ask a tool-using agent a question
#[derive(Parser)]
#[command(name = "skillagent")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Ask a zero-shot ReAct agent a question")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file or directory path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API key override
    #[arg(long, env = "SKILLAGENT_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Base URL override
    #[arg(long)]
    base_url: Option<String>,

    /// Model name override
    #[arg(long)]
    model: Option<String>,

    /// Sampling temperature override
    #[arg(long)]
    temperature: Option<f32>,

    /// Maximum number of reasoning steps
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Print the agent's reasoning chain
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug")]
    debug_output: bool,

    /// The question to ask
    question: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show available tools
    Tools,
}

/// Build a configuration loader from CLI arguments
fn build_config_loader(cli: &Cli) -> CliConfigLoader {
    let mut loader = CliConfigLoader::new();

    if let Some(config_path) = &cli.config {
        loader = loader.with_config_override(config_path.clone());
    }

    if let Some(api_key) = &cli.api_key {
        loader = loader.with_api_key_override(api_key.clone());
    }

    if let Some(base_url) = &cli.base_url {
        loader = loader.with_base_url_override(base_url.clone());
    }

    if let Some(model) = &cli.model {
        loader = loader.with_model_override(model.clone());
    }

    if let Some(temperature) = cli.temperature {
        loader = loader.with_temperature_override(temperature);
    }

    loader
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    skillagent_core::init_tracing_with_debug(cli.debug_output);

    let config_loader = build_config_loader(&cli);

    match (cli.question, cli.command) {
        (Some(_), Some(_)) => {
            anyhow::bail!("Cannot specify both a question and a subcommand")
        }
        (None, Some(Commands::Tools)) => tools_command().await,
        (question, None) => {
            let question = question.unwrap_or_else(|| DEFAULT_QUESTION.to_string());
            run_command(question, config_loader, cli.max_iterations, cli.verbose).await
        }
    }
}

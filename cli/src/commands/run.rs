//! Single question execution command

use crate::config::CliConfigLoader;
use crate::output::{CliOutputConfig, CliOutputHandler};
use anyhow::{Context, Result};
use skillagent_core::output::{AgentOutput, NullOutput};
use skillagent_core::{Agent, AgentBuilder};
use std::io::Write;
use tracing::info;

/// Question asked when none is given on the command line
pub const DEFAULT_QUESTION: &str = "What are the best ways to learn Python for a beginner?";

/// Answer a single question
pub async fn run_command(
    question: String,
    config_loader: CliConfigLoader,
    max_iterations: Option<usize>,
    verbose: bool,
) -> Result<()> {
    // Load LLM and agent configuration
    let config = config_loader.load().await?;
    info!("Using {}", config.llm);

    let mut agent_config = config.agent;
    if let Some(max_iterations) = max_iterations {
        agent_config.max_iterations = max_iterations;
    }

    let output: Box<dyn AgentOutput> = if verbose {
        Box::new(CliOutputHandler::new(CliOutputConfig::default()))
    } else {
        Box::new(NullOutput)
    };

    let mut agent = AgentBuilder::new(config.llm)
        .with_agent_config(agent_config)
        .with_output(output)
        .build()
        .context("Failed to create agent")?;

    drive(&mut agent, &question, &mut std::io::stdout()).await
}

/// Ask `agent` one question and print its answer as a single line
pub async fn drive<A, W>(agent: &mut A, question: &str, out: &mut W) -> Result<()>
where
    A: Agent + ?Sized,
    W: Write,
{
    let response = agent
        .run(question)
        .await
        .with_context(|| format!("{} agent failed to answer", agent.agent_type()))?;

    writeln!(out, "Agent response: {}", response)?;
    out.flush()?;
    Ok(())
}

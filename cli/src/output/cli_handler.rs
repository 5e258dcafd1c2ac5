//! CLI output handler implementation

use async_trait::async_trait;
use colored::Colorize;
use skillagent_core::output::{AgentEvent, AgentOutput, MessageLevel, OutputResult};
use std::io::Write;
use tracing::debug;

/// CLI output configuration
#[derive(Debug, Clone)]
pub struct CliOutputConfig {
    /// Print per-run statistics after the chain finishes
    pub show_stats: bool,
}

impl Default for CliOutputConfig {
    fn default() -> Self {
        Self { show_stats: true }
    }
}

/// Renders the agent's reasoning chain on stderr, keeping stdout for the answer
pub struct CliOutputHandler {
    config: CliOutputConfig,
}

impl CliOutputHandler {
    /// Create a new CLI output handler
    pub fn new(config: CliOutputConfig) -> Self {
        Self { config }
    }

    /// Format an event for the terminal, or `None` when it has no trace line
    fn render(&self, event: &AgentEvent) -> Option<String> {
        match event {
            AgentEvent::ExecutionStarted { .. } => Some(format!(
                "\n\n{}\n",
                "> Entering new AgentExecutor chain...".bold()
            )),

            AgentEvent::AgentAction { log, .. } => Some(log.green().to_string()),

            AgentEvent::Observation { observation, .. } => Some(format!(
                "\nObservation: {}\nThought:",
                observation.yellow()
            )),

            AgentEvent::AgentFinish { log, .. } => Some(log.green().to_string()),

            AgentEvent::ExecutionCompleted {
                context, summary, ..
            } => {
                let mut out = format!("\n\n{}\n", "> Finished chain.".bold());
                if self.config.show_stats {
                    out.push_str(&format!(
                        "{}\n",
                        format!(
                            "{} in {} steps, {:.2}s",
                            summary,
                            context.current_step,
                            context.execution_time.as_secs_f64()
                        )
                        .dimmed()
                    ));
                    let usage = &context.token_usage;
                    if usage.total_tokens > 0 {
                        out.push_str(&format!(
                            "{}\n",
                            format!(
                                "Tokens: {} input + {} output = {} total",
                                usage.input_tokens, usage.output_tokens, usage.total_tokens
                            )
                            .dimmed()
                        ));
                    }
                }
                Some(out)
            }

            AgentEvent::Message { level, content } => match level {
                MessageLevel::Debug => None,
                MessageLevel::Info => Some(format!("\n{}\n", content)),
                MessageLevel::Warning => Some(format!("\n{}\n", content.yellow())),
                MessageLevel::Error => Some(format!("\n{}\n", content.red())),
            },

            AgentEvent::ToolExecutionStarted { tool_info } => {
                debug!(tool = %tool_info.tool_name, "Tool started: {}", tool_info.input);
                None
            }

            AgentEvent::ToolExecutionCompleted { tool_info } => {
                debug!(
                    tool = %tool_info.tool_name,
                    status = ?tool_info.status,
                    "Tool completed"
                );
                None
            }

            AgentEvent::TokenUsageUpdated { token_usage } => {
                debug!(total_tokens = token_usage.total_tokens, "Token usage updated");
                None
            }
        }
    }
}

impl Default for CliOutputHandler {
    fn default() -> Self {
        Self::new(CliOutputConfig::default())
    }
}

#[async_trait]
impl AgentOutput for CliOutputHandler {
    async fn emit_event(&self, event: AgentEvent) -> OutputResult {
        if let Some(text) = self.render(&event) {
            let mut stderr = std::io::stderr().lock();
            stderr.write_all(text.as_bytes())?;
        }
        Ok(())
    }

    async fn flush(&self) -> OutputResult {
        std::io::stderr().flush()?;
        Ok(())
    }
}

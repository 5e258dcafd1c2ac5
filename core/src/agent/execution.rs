//! Agent execution result structures

use super::parser::AgentAction;
use crate::output::TokenUsage;
use serde::{Deserialize, Serialize};

/// Answer returned when the iteration or time limit is hit
pub const FORCE_STOP_ANSWER: &str = "Agent stopped due to iteration limit or time limit.";

/// One action taken by the agent and what it observed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntermediateStep {
    pub action: AgentAction,
    pub observation: String,
}

/// Result of agent execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentExecution {
    /// Whether the model reached a final answer
    pub success: bool,

    /// Final answer, or the force-stop message
    pub final_result: String,

    /// Number of model calls made
    pub steps_executed: usize,

    /// Total execution time in milliseconds
    pub duration_ms: u64,

    /// Tokens consumed across all model calls
    pub token_usage: TokenUsage,

    /// Actions taken before the final answer, in order
    pub intermediate_steps: Vec<IntermediateStep>,
}

impl AgentExecution {
    /// The model produced a final answer
    pub fn finished(final_result: String, steps_executed: usize, duration_ms: u64) -> Self {
        Self {
            success: true,
            final_result,
            steps_executed,
            duration_ms,
            token_usage: TokenUsage::default(),
            intermediate_steps: Vec::new(),
        }
    }

    /// The loop was cut off before a final answer
    pub fn stopped(steps_executed: usize, duration_ms: u64) -> Self {
        Self {
            success: false,
            final_result: FORCE_STOP_ANSWER.to_string(),
            steps_executed,
            duration_ms,
            token_usage: TokenUsage::default(),
            intermediate_steps: Vec::new(),
        }
    }

    pub fn with_token_usage(mut self, token_usage: TokenUsage) -> Self {
        self.token_usage = token_usage;
        self
    }

    pub fn with_intermediate_steps(mut self, steps: Vec<IntermediateStep>) -> Self {
        self.intermediate_steps = steps;
        self
    }
}

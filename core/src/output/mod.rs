//! Output abstraction layer for the agent core
//!
//! The agent reports its reasoning chain as events. Callers decide how to
//! render them (terminal trace, logs, nothing at all).

use crate::tools::{ToolCall, ToolResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub type OutputResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Null output handler that discards all events
pub struct NullOutput;

#[async_trait]
impl AgentOutput for NullOutput {
    async fn emit_event(&self, _event: AgentEvent) -> OutputResult {
        Ok(())
    }
}

/// Status of tool execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolExecutionStatus {
    /// Tool is currently executing
    Executing,
    /// Tool completed successfully
    Success,
    /// Tool failed with an error
    Error,
}

/// Tool execution information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolExecutionInfo {
    /// Identifier of the tool call
    pub execution_id: String,
    /// Tool name
    pub tool_name: String,
    /// Text input passed to the tool
    pub input: String,
    /// Current execution status
    pub status: ToolExecutionStatus,
    /// Tool result (if completed)
    pub result: Option<ToolResult>,
    /// Timestamp of status change
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl ToolExecutionInfo {
    pub fn new(tool_call: &ToolCall, status: ToolExecutionStatus, result: Option<&ToolResult>) -> Self {
        Self {
            execution_id: tool_call.id.clone(),
            tool_name: tool_call.name.clone(),
            input: tool_call.input.clone(),
            status,
            result: result.cloned(),
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Total input tokens consumed
    pub input_tokens: u32,
    /// Total output tokens generated
    pub output_tokens: u32,
    /// Total tokens (input + output)
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn add(&mut self, usage: &crate::llm::Usage) {
        self.input_tokens += usage.prompt_tokens;
        self.output_tokens += usage.completion_tokens;
        self.total_tokens += usage.total_tokens;
    }
}

/// Agent execution context information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentExecutionContext {
    /// Agent type identifier
    pub agent_id: String,
    /// Question being answered
    pub question: String,
    /// Maximum allowed iterations
    pub max_iterations: usize,
    /// Current iteration number
    pub current_step: usize,
    /// Total execution time so far
    pub execution_time: Duration,
    /// Token usage statistics
    pub token_usage: TokenUsage,
}

/// Events that can be emitted during agent execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AgentEvent {
    /// Agent execution started
    ExecutionStarted { context: AgentExecutionContext },
    /// Agent execution completed
    ExecutionCompleted {
        context: AgentExecutionContext,
        success: bool,
        summary: String,
    },
    /// Model chose an action; `log` is its raw reasoning text
    AgentAction {
        step_number: usize,
        log: String,
        tool: String,
        tool_input: String,
    },
    /// Tool execution started
    ToolExecutionStarted { tool_info: ToolExecutionInfo },
    /// Tool execution completed
    ToolExecutionCompleted { tool_info: ToolExecutionInfo },
    /// Observation fed back to the model
    Observation {
        step_number: usize,
        observation: String,
    },
    /// Model produced its final answer
    AgentFinish {
        step_number: usize,
        log: String,
        answer: String,
    },
    /// Token usage updated (emitted after each LLM call)
    TokenUsageUpdated { token_usage: TokenUsage },
    /// General message or log
    Message { level: MessageLevel, content: String },
}

/// Message severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageLevel {
    Debug,
    Info,
    Warning,
    Error,
}

/// Abstract output interface for agent execution
#[async_trait]
pub trait AgentOutput: Send + Sync {
    /// Emit an agent event
    async fn emit_event(&self, event: AgentEvent) -> OutputResult;

    /// Emit a message with specified level
    async fn emit_message(&self, level: MessageLevel, content: &str) -> OutputResult {
        self.emit_event(AgentEvent::Message {
            level,
            content: content.to_string(),
        })
        .await
    }

    /// Emit debug message
    async fn debug(&self, content: &str) -> OutputResult {
        self.emit_message(MessageLevel::Debug, content).await
    }

    /// Emit warning message
    async fn warning(&self, content: &str) -> OutputResult {
        self.emit_message(MessageLevel::Warning, content).await
    }

    /// Emit error message
    async fn error(&self, content: &str) -> OutputResult {
        self.emit_message(MessageLevel::Error, content).await
    }

    /// Emit token usage update
    async fn emit_token_update(&self, token_usage: TokenUsage) -> OutputResult {
        self.emit_event(AgentEvent::TokenUsageUpdated { token_usage })
            .await
    }

    /// Flush any buffered output
    async fn flush(&self) -> OutputResult {
        Ok(())
    }
}

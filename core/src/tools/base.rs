//! Base tool traits and structures

use crate::error::{Result, ToolError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use uuid::Uuid;

/// Trait for all tools
///
/// A tool is a named capability the agent may invoke by name while reasoning.
/// Input and output are plain text.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the name of the tool, unique within an executor
    fn name(&self) -> &str;

    /// Get the description the agent uses to decide when to call the tool
    fn description(&self) -> &str;

    /// Invoke the tool with the given input
    async fn invoke(&self, input: &str) -> Result<String>;
}

/// A call to a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this tool call
    pub id: String,

    /// Name of the tool to call
    pub name: String,

    /// Text input for the tool
    pub input: String,
}

/// Result of a tool execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// ID of the tool call this is a result for
    pub tool_call_id: String,

    /// Whether the execution was successful
    pub success: bool,

    /// Result content
    pub content: String,

    /// Execution duration in milliseconds
    pub duration_ms: Option<u64>,
}

/// Tool executor holding the ordered set of tools an agent can call
pub struct ToolExecutor {
    tools: Vec<Box<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new<N: Into<String>, I: Into<String>>(name: N, input: I) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            input: input.into(),
        }
    }
}

impl ToolResult {
    /// Create a successful result
    pub fn success<S: Into<String>>(tool_call_id: S, content: S) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            success: true,
            content: content.into(),
            duration_ms: None,
        }
    }

    /// Create an error result
    pub fn error<S: Into<String>>(tool_call_id: S, error: S) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            success: false,
            content: format!("Error: {}", error.into()),
            duration_ms: None,
        }
    }

    /// Set execution duration
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}

impl ToolExecutor {
    /// Create a new tool executor
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a tool, keeping registration order
    pub fn register_tool(&mut self, tool: Box<dyn Tool>) -> Result<()> {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(ToolError::DuplicateName { name }.into());
        }

        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Get a tool by name
    pub fn get_tool(&self, name: &str) -> Option<&dyn Tool> {
        self.index.get(name).map(|&i| self.tools[i].as_ref())
    }

    /// List all tool names in registration order
    pub fn list_tools(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Iterate over tools in registration order
    pub fn tools(&self) -> impl Iterator<Item = &dyn Tool> {
        self.tools.iter().map(|t| t.as_ref())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a tool call
    ///
    /// Fails only when the tool is unknown. A tool's own failure is returned
    /// as an unsuccessful [`ToolResult`] so the agent can observe it.
    pub async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let tool = self
            .get_tool(&call.name)
            .ok_or_else(|| ToolError::NotFound {
                name: call.name.clone(),
            })?;

        let start_time = Instant::now();
        let result = tool.invoke(&call.input).await;
        let duration = start_time.elapsed().as_millis() as u64;

        match result {
            Ok(content) => Ok(ToolResult::success(call.id, content).with_duration(duration)),
            Err(e) => {
                tracing::warn!(tool = %call.name, "Tool invocation failed: {}", e);
                Ok(ToolResult::error(call.id, e.to_string()).with_duration(duration))
            }
        }
    }
}

impl Default for ToolExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::EchoTool;

    struct FailingTool;

    #[async_trait]
    impl Tool for FailingTool {
        fn name(&self) -> &str {
            "Broken"
        }

        fn description(&self) -> &str {
            "Always fails."
        }

        async fn invoke(&self, _input: &str) -> Result<String> {
            Err(ToolError::ExecutionFailed {
                name: "Broken".to_string(),
                message: "boom".to_string(),
            }
            .into())
        }
    }

    #[test]
    fn test_duplicate_tool_name_rejected() {
        let mut executor = ToolExecutor::new();
        executor.register_tool(Box::new(EchoTool::new())).unwrap();

        let err = executor.register_tool(Box::new(EchoTool::new())).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Tool(ToolError::DuplicateName { .. })
        ));
        assert_eq!(executor.len(), 1);
    }

    #[test]
    fn test_tools_keep_registration_order() {
        let mut executor = ToolExecutor::new();
        executor.register_tool(Box::new(FailingTool)).unwrap();
        executor.register_tool(Box::new(EchoTool::new())).unwrap();

        assert_eq!(executor.list_tools(), vec!["Broken", "EchoTool"]);
    }

    #[tokio::test]
    async fn test_execute_dispatches_by_name() {
        let mut executor = ToolExecutor::new();
        executor.register_tool(Box::new(EchoTool::new())).unwrap();

        let call = ToolCall::new("EchoTool", "hello");
        let call_id = call.id.clone();
        let result = executor.execute(call).await.unwrap();

        assert!(result.success);
        assert_eq!(result.content, "Echo: hello");
        assert_eq!(result.tool_call_id, call_id);
        assert!(result.duration_ms.is_some());
    }

    #[tokio::test]
    async fn test_unknown_tool_is_an_error() {
        let executor = ToolExecutor::new();
        let err = executor
            .execute(ToolCall::new("Missing", "x"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Tool(ToolError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_tool_failure_becomes_error_result() {
        let mut executor = ToolExecutor::new();
        executor.register_tool(Box::new(FailingTool)).unwrap();

        let result = executor
            .execute(ToolCall::new("Broken", "x"))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.content.starts_with("Error: "));
        assert!(result.content.contains("boom"));
    }
}

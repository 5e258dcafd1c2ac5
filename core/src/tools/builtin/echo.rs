//! Echo tool

use crate::error::Result;
use crate::impl_tool_factory;
use crate::tools::Tool;
use async_trait::async_trait;

pub const ECHO_TOOL_NAME: &str = "EchoTool";
const ECHO_TOOL_DESCRIPTION: &str = "Echoes the input text.";

/// Prefix `input` with `"Echo: "`, leaving the rest untouched.
pub fn echo(input: &str) -> String {
    format!("Echo: {}", input)
}

/// Tool that echoes its input back
pub struct EchoTool;

impl EchoTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        ECHO_TOOL_NAME
    }

    fn description(&self) -> &str {
        ECHO_TOOL_DESCRIPTION
    }

    async fn invoke(&self, input: &str) -> Result<String> {
        Ok(echo(input))
    }
}

impl Default for EchoTool {
    fn default() -> Self {
        Self::new()
    }
}

impl_tool_factory!(
    EchoToolFactory,
    EchoTool,
    ECHO_TOOL_NAME,
    ECHO_TOOL_DESCRIPTION
);

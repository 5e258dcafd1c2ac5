//! Tool system and built-in tools

pub mod base;
pub mod builtin;
pub mod registry;

pub use base::{Tool, ToolCall, ToolExecutor, ToolResult};
pub use builtin::{EchoTool, ECHO_TOOL_NAME};
pub use registry::{default_tools, ToolFactory, ToolRegistry};

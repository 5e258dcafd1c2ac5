//! Built-in tools

pub mod echo;

pub use echo::{echo, EchoTool, EchoToolFactory, ECHO_TOOL_NAME};

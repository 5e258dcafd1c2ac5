//! Agent reasoning loop and execution engine

pub mod base;
pub mod config;
pub mod execution;
pub mod parser;
pub mod prompt;
pub mod zero_shot;

pub use base::{Agent, AgentResult};
pub use config::{create_llm_client, AgentBuilder, AgentConfig};
pub use execution::{AgentExecution, IntermediateStep, FORCE_STOP_ANSWER};
pub use parser::{AgentAction, AgentFinish, ParsedOutput};
pub use zero_shot::ZeroShotAgent;

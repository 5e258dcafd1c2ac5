//! Base agent trait

use crate::error::Result;
use async_trait::async_trait;

/// Result type for agent operations
pub type AgentResult<T> = Result<T>;

/// Something that answers a natural-language question, possibly using tools
#[async_trait]
pub trait Agent: Send + Sync {
    /// Answer `question` and return the final natural-language answer
    async fn run(&mut self, question: &str) -> AgentResult<String>;

    /// Get the agent's name/type
    fn agent_type(&self) -> &str;
}

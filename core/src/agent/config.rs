//! Agent configuration structures

use crate::config::{ModelParams, Protocol, ResolvedLlmConfig};
use crate::error::{AgentError, ConfigError, Result};
use crate::llm::{LlmClient, OpenAiClient};
use crate::output::{AgentOutput, NullOutput};
use crate::tools::ToolRegistry;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::ZeroShotAgent;

/// Configuration for an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Maximum number of model calls before force-stopping
    pub max_iterations: usize,

    /// Wall-clock budget in seconds, checked between iterations
    pub max_execution_time_secs: Option<u64>,

    /// Feed unparsable model output back as an observation instead of failing
    pub handle_parsing_errors: bool,

    /// Tools available to this agent, in prompt order
    pub tools: Vec<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: 15,
            max_execution_time_secs: None,
            handle_parsing_errors: false,
            tools: crate::tools::default_tools(),
        }
    }
}

enum LlmSource {
    Config(ResolvedLlmConfig),
    Client(Arc<dyn LlmClient>),
}

/// Builder for creating agents
pub struct AgentBuilder {
    llm: LlmSource,
    params: ModelParams,
    agent_config: AgentConfig,
    tool_registry: ToolRegistry,
    output: Box<dyn AgentOutput>,
}

impl AgentBuilder {
    /// Create a new agent builder with LLM configuration
    pub fn new(llm_config: ResolvedLlmConfig) -> Self {
        let params = llm_config.params.clone();
        Self::with_source(LlmSource::Config(llm_config), params)
    }

    /// Create a new agent builder around an existing client
    pub fn with_client(client: Arc<dyn LlmClient>) -> Self {
        Self::with_source(LlmSource::Client(client), ModelParams::default())
    }

    fn with_source(llm: LlmSource, params: ModelParams) -> Self {
        Self {
            llm,
            params,
            agent_config: AgentConfig::default(),
            tool_registry: ToolRegistry::default(),
            output: Box::new(NullOutput),
        }
    }

    /// Set agent configuration
    pub fn with_agent_config(mut self, agent_config: AgentConfig) -> Self {
        self.agent_config = agent_config;
        self
    }

    /// Set maximum iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.agent_config.max_iterations = max_iterations;
        self
    }

    /// Set tools
    pub fn with_tools(mut self, tools: Vec<String>) -> Self {
        self.agent_config.tools = tools;
        self
    }

    /// Set model parameters
    pub fn with_params(mut self, params: ModelParams) -> Self {
        self.params = params;
        self
    }

    /// Use a custom tool registry
    pub fn with_tool_registry(mut self, tool_registry: ToolRegistry) -> Self {
        self.tool_registry = tool_registry;
        self
    }

    /// Set output handler
    pub fn with_output(mut self, output: Box<dyn AgentOutput>) -> Self {
        self.output = output;
        self
    }

    /// Build the agent
    pub fn build(self) -> Result<ZeroShotAgent> {
        let llm_client = match self.llm {
            LlmSource::Config(config) => create_llm_client(&config)?,
            LlmSource::Client(client) => client,
        };

        let tool_executor = self
            .tool_registry
            .create_executor(&self.agent_config.tools)?;
        if tool_executor.is_empty() {
            return Err(AgentError::NoTools.into());
        }

        Ok(ZeroShotAgent::new(
            self.agent_config,
            llm_client,
            self.params,
            tool_executor,
            self.output,
        ))
    }
}

/// Create an LLM client for the configured protocol
pub fn create_llm_client(config: &ResolvedLlmConfig) -> Result<Arc<dyn LlmClient>> {
    match &config.protocol {
        Protocol::OpenAICompat => Ok(Arc::new(OpenAiClient::new(config)?)),
        Protocol::Custom(name) => Err(ConfigError::UnsupportedProtocol {
            protocol: name.clone(),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn llm_config(protocol: Protocol, api_key: &str) -> ResolvedLlmConfig {
        ResolvedLlmConfig::new(
            protocol,
            "https://api.openai.com/v1".to_string(),
            api_key.to_string(),
            "gpt-3.5-turbo".to_string(),
        )
    }

    #[test]
    fn test_default_agent_config() {
        let config = AgentConfig::default();
        assert_eq!(config.max_iterations, 15);
        assert_eq!(config.tools, vec!["EchoTool".to_string()]);
        assert!(!config.handle_parsing_errors);
        assert_eq!(config.max_execution_time_secs, None);
    }

    #[test]
    fn test_agent_config_serialization_defaults() {
        let config: AgentConfig = serde_json::from_str(r#"{"max_iterations": 3}"#).unwrap();
        assert_eq!(config.max_iterations, 3);
        assert_eq!(config.tools, vec!["EchoTool".to_string()]);
        assert!(!config.handle_parsing_errors);
    }

    #[test]
    fn test_build_from_openai_config() {
        let agent = AgentBuilder::new(llm_config(Protocol::OpenAICompat, "sk-test"))
            .build()
            .unwrap();
        assert_eq!(agent.tool_names(), vec!["EchoTool"]);
    }

    #[test]
    fn test_build_without_credential_fails() {
        let err = AgentBuilder::new(llm_config(Protocol::OpenAICompat, ""))
            .build()
            .err()
            .unwrap();
        assert!(matches!(
            err,
            Error::Llm(crate::error::LlmError::MissingCredential { .. })
        ));
    }

    #[test]
    fn test_build_with_unsupported_protocol_fails() {
        let err = AgentBuilder::new(llm_config(Protocol::Custom("gemini".into()), "k"))
            .build()
            .err()
            .unwrap();
        assert!(matches!(
            err,
            Error::Config(ConfigError::UnsupportedProtocol { .. })
        ));
    }

    #[test]
    fn test_build_without_tools_fails() {
        let err = AgentBuilder::new(llm_config(Protocol::OpenAICompat, "sk-test"))
            .with_tools(Vec::new())
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, Error::Agent(AgentError::NoTools)));
    }
}

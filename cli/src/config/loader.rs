//! Simple CLI configuration loader for SkillAgent
//!
//! Implements single-source priority loading with flag overrides:
//! 1. --config file/dir (highest priority)
//! 2. Current working directory: ./skillagent.json or ./.skillagent/config.json
//! 3. User config dir: $XDG_CONFIG_HOME/skillagent/config.json or ~/.config/skillagent/config.json
//! 4. Environment variables only (no files)

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use skillagent_core::{AgentConfig, ModelParams, Protocol, ResolvedLlmConfig};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "skillagent";
const CONFIG_FILE: &str = "config.json";
const DEFAULT_PROTOCOL: &str = "openai";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_TEMPERATURE: f32 = 0.0;

fn default_protocol() -> String {
    DEFAULT_PROTOCOL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

/// Raw configuration file format (simple single-file schema)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawConfig {
    /// Protocol to use
    #[serde(default = "default_protocol")]
    pub protocol: String,
    /// API key (can be "env:VAR_NAME" for environment variable)
    #[serde(default)]
    pub api_key: String,
    /// Base URL (optional, uses protocol default if not specified)
    pub base_url: Option<String>,
    /// Model name
    #[serde(default = "default_model")]
    pub model: String,
    /// Model parameters (optional)
    #[serde(default)]
    pub params: ModelParams,
    /// Agent loop settings (optional)
    #[serde(default)]
    pub agent: AgentConfig,
}

/// Everything the run command needs, fully resolved
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub llm: ResolvedLlmConfig,
    pub agent: AgentConfig,
}

/// CLI configuration loader
#[derive(Debug, Default)]
pub struct CliConfigLoader {
    /// Override config file/directory path
    config_override: Option<PathBuf>,
    /// Flag overrides
    api_key_override: Option<String>,
    base_url_override: Option<String>,
    model_override: Option<String>,
    temperature_override: Option<f32>,
}

impl CliConfigLoader {
    /// Create a new loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Set config file/directory override; `~` and `$VAR` are expanded
    pub fn with_config_override(mut self, path: PathBuf) -> Self {
        let raw = path.to_string_lossy();
        let expanded = shellexpand::full(&raw)
            .map(|p| PathBuf::from(p.as_ref()))
            .unwrap_or_else(|_| path.clone());
        self.config_override = Some(expanded);
        self
    }

    /// Set API key override
    pub fn with_api_key_override(mut self, api_key: String) -> Self {
        self.api_key_override = Some(api_key);
        self
    }

    /// Set base URL override
    pub fn with_base_url_override(mut self, base_url: String) -> Self {
        self.base_url_override = Some(base_url);
        self
    }

    /// Set model override
    pub fn with_model_override(mut self, model: String) -> Self {
        self.model_override = Some(model);
        self
    }

    /// Set temperature override
    pub fn with_temperature_override(mut self, temperature: f32) -> Self {
        self.temperature_override = Some(temperature);
        self
    }

    /// Load and resolve configuration
    pub async fn load(&self) -> Result<CliConfig> {
        // Step 1: Find and load base configuration
        let config = if let Some(override_path) = &self.config_override {
            self.load_from_path(override_path).await.with_context(|| {
                format!(
                    "Failed to load config from override path: {}",
                    override_path.display()
                )
            })?
        } else {
            self.search_and_load().await?
        };

        // Step 2: Apply flag overrides and resolve
        self.resolve_config(self.apply_overrides(config))
    }

    fn apply_overrides(&self, mut config: RawConfig) -> RawConfig {
        if let Some(api_key) = &self.api_key_override {
            config.api_key = api_key.clone();
        }
        if let Some(base_url) = &self.base_url_override {
            config.base_url = Some(base_url.clone());
        }
        if let Some(model) = &self.model_override {
            config.model = model.clone();
        }
        if let Some(temperature) = self.temperature_override {
            config.params.temperature = Some(temperature);
        }
        config
    }

    /// Search for config in priority order
    async fn search_and_load(&self) -> Result<RawConfig> {
        // 1. Current working directory
        if let Some(config) = self.try_load_cwd().await? {
            return Ok(config);
        }

        // 2. User config directory
        if let Some(config) = self.try_load_user_config_dir().await? {
            return Ok(config);
        }

        // 3. Environment variables only
        self.try_load_env_only()
    }

    /// Try loading from current working directory
    async fn try_load_cwd(&self) -> Result<Option<RawConfig>> {
        let cwd = std::env::current_dir()?;

        let app_json = cwd.join(format!("{}.json", APP_DIR));
        if app_json.exists() {
            return Ok(Some(self.load_file(&app_json).await?));
        }

        let app_dir_config = cwd.join(format!(".{}", APP_DIR)).join(CONFIG_FILE);
        if app_dir_config.exists() {
            return Ok(Some(self.load_file(&app_dir_config).await?));
        }

        Ok(None)
    }

    /// Try loading from the platform config directory
    async fn try_load_user_config_dir(&self) -> Result<Option<RawConfig>> {
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join(APP_DIR).join(CONFIG_FILE);
            if config_path.exists() {
                return Ok(Some(self.load_file(&config_path).await?));
            }
        }
        Ok(None)
    }

    /// Try loading from environment variables only
    fn try_load_env_only(&self) -> Result<RawConfig> {
        let api_key = match std::env::var("OPENAI_API_KEY").ok() {
            Some(key) => key,
            None if self.api_key_override.is_some() => String::new(),
            None => {
                return Err(anyhow!(
                    "No configuration found. Please create a {}.json file, set OPENAI_API_KEY or pass --api-key",
                    APP_DIR
                ))
            }
        };

        let model = std::env::var("OPENAI_MODEL")
            .or_else(|_| std::env::var("SKILLAGENT_MODEL"))
            .unwrap_or_else(|_| default_model());

        Ok(RawConfig {
            protocol: default_protocol(),
            api_key,
            base_url: std::env::var("OPENAI_BASE_URL").ok(),
            model,
            params: ModelParams::default(),
            agent: AgentConfig::default(),
        })
    }

    /// Load configuration from a specific path (file or directory)
    async fn load_from_path(&self, path: &Path) -> Result<RawConfig> {
        if path.is_file() {
            self.load_file(path).await
        } else if path.is_dir() {
            let config_file = path.join(CONFIG_FILE);
            if config_file.exists() {
                self.load_file(&config_file).await
            } else {
                Err(anyhow!(
                    "No {} found in directory: {}",
                    CONFIG_FILE,
                    path.display()
                ))
            }
        } else {
            Err(anyhow!("Config path does not exist: {}", path.display()))
        }
    }

    /// Load a single config file
    async fn load_file(&self, path: &Path) -> Result<RawConfig> {
        tracing::debug!("Loading config from {}", path.display());

        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Resolve raw config to the final CLI config
    fn resolve_config(&self, config: RawConfig) -> Result<CliConfig> {
        let protocol = Protocol::parse(&config.protocol);

        // Resolve API key (handle env: prefix)
        let api_key = match config.api_key.strip_prefix("env:") {
            Some(var_name) => std::env::var(var_name)
                .with_context(|| format!("Environment variable not found: {}", var_name))?,
            None => config.api_key,
        };

        let base_url = match config.base_url {
            Some(base_url) => base_url,
            None => protocol
                .default_base_url()
                .ok_or_else(|| {
                    anyhow!(
                        "Protocol '{}' has no default base URL; set base_url",
                        protocol.as_str()
                    )
                })?
                .to_string(),
        };

        let mut params = config.params;
        if params.temperature.is_none() {
            params.temperature = Some(DEFAULT_TEMPERATURE);
        }

        let llm = ResolvedLlmConfig::new(protocol, base_url, api_key, config.model)
            .with_params(params);

        llm.validate()
            .map_err(|e| anyhow!("Configuration validation failed: {}", e))?;

        Ok(CliConfig {
            llm,
            agent: config.agent,
        })
    }
}

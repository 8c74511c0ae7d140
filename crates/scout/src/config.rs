use crate::errors::ConfigError;
use config::{Config, Environment};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::Path;

/// Credential for the language model provider
pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
/// Credential for the web search tool service
pub const LINKUP_API_KEY: &str = "LINKUP_API_KEY";

const ENV_PREFIX: &str = "SCOUT";

pub const DEFAULT_AGENT_HOST: &str = "http://127.0.0.1:2024";
pub const DEFAULT_GRAPH_ID: &str = "deep_agent";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_SEARCH_NAME: &str = "websearch";
pub const DEFAULT_SEARCH_URL: &str = "https://mcp.linkup.so/sse";
pub const DEFAULT_INSTRUCTIONS: &str = "You are a helpful AI agent. Use the websearch tools to \
answer with live information, prefer fresh search results for anything time-sensitive, \
and cite the sources you used.";

/// An API key. Never printed in full.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new<S: Into<String>>(key: S) -> Self {
        ApiKey(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(****)")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    #[default]
    Sse,
    StreamableHttp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentSettings {
    #[serde(default = "default_agent_host")]
    pub host: String,
    #[serde(default = "default_graph_id")]
    pub graph_id: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelSettings {
    #[serde(default = "default_model")]
    pub name: String,
    #[serde(default)]
    pub api_key: Option<ApiKey>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_search_name")]
    pub name: String,
    #[serde(default = "default_search_url")]
    pub url: String,
    #[serde(default)]
    pub transport: Transport,
    #[serde(default)]
    pub api_key: Option<ApiKey>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub agent: AgentSettings,
    pub model: ModelSettings,
    pub search: SearchSettings,
    #[serde(default = "default_instructions")]
    pub instructions: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            agent: AgentSettings {
                host: default_agent_host(),
                graph_id: default_graph_id(),
                timeout_secs: None,
            },
            model: ModelSettings {
                name: default_model(),
                api_key: None,
            },
            search: SearchSettings {
                name: default_search_name(),
                url: default_search_url(),
                transport: Transport::Sse,
                api_key: None,
            },
            instructions: default_instructions(),
        }
    }
}

impl Settings {
    /// Load `.env` from the working directory (if any), then read the environment
    pub fn new() -> Result<Self, ConfigError> {
        load_dotenv();
        Self::from_env()
    }

    /// Load a specific env file, then read the environment
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        dotenv::from_path(path).map_err(|e| ConfigError::EnvFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("agent.host", default_agent_host())?
            .set_default("agent.graph_id", default_graph_id())?
            .set_default("model.name", default_model())?
            .set_default("search.name", default_search_name())?
            .set_default("search.url", default_search_url())?
            .set_default("search.transport", "sse")?
            .set_default("instructions", default_instructions())?;

        // The conventional credential names act as defaults; prefixed variables win.
        if let Some(key) = non_blank_var(GOOGLE_API_KEY) {
            builder = builder.set_default("model.api_key", key)?;
        }
        if let Some(key) = non_blank_var(LINKUP_API_KEY) {
            builder = builder.set_default("search.api_key", key)?;
        }

        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Self = config.try_deserialize().map_err(|err| {
            tracing::debug!("Configuration error: {:?}", &err);
            ConfigError::from(err)
        })?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        // A zero deadline would fail every question before it is sent.
        if self.agent.timeout_secs == Some(0) {
            return Err(ConfigError::Invalid {
                key: "agent.timeout_secs".to_string(),
                reason: "must be at least 1 second, or unset for no timeout".to_string(),
            });
        }
        Ok(())
    }

    pub fn with_model_api_key<S: Into<String>>(mut self, key: S) -> Self {
        self.model.api_key = Some(ApiKey::new(key));
        self
    }

    pub fn with_search_api_key<S: Into<String>>(mut self, key: S) -> Self {
        self.search.api_key = Some(ApiKey::new(key));
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.agent.timeout_secs = Some(secs);
        self
    }

    pub fn model_api_key(&self) -> Option<&ApiKey> {
        self.model.api_key.as_ref().filter(|key| !key.is_blank())
    }

    pub fn search_api_key(&self) -> Option<&ApiKey> {
        self.search.api_key.as_ref().filter(|key| !key.is_blank())
    }

    /// Names of the credential variables that are not set
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.model_api_key().is_none() {
            missing.push(GOOGLE_API_KEY);
        }
        if self.search_api_key().is_none() {
            missing.push(LINKUP_API_KEY);
        }
        missing
    }
}

/// Load `.env` from the working directory, ignoring a missing file
pub fn load_dotenv() {
    if let Err(err) = dotenv::dotenv() {
        if !err.not_found() {
            tracing::warn!("Ignoring unreadable .env file: {}", err);
        }
    }
}

fn non_blank_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn default_agent_host() -> String {
    DEFAULT_AGENT_HOST.to_string()
}

fn default_graph_id() -> String {
    DEFAULT_GRAPH_ID.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_search_name() -> String {
    DEFAULT_SEARCH_NAME.to_string()
}

fn default_search_url() -> String {
    DEFAULT_SEARCH_URL.to_string()
}

fn default_instructions() -> String {
    DEFAULT_INSTRUCTIONS.to_string()
}

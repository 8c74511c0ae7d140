//! Everything the agent host needs to construct an agent: which tool servers to
//! connect, which model to drive, and the behaviour policy it follows.
use crate::config::{ApiKey, Settings, Transport, GOOGLE_API_KEY, LINKUP_API_KEY};
use crate::errors::ConfigError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

const API_KEY_PARAM: &str = "apiKey";

/// A remote tool server reachable over the given transport
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ServerSpec {
    pub transport: Transport,
    pub url: Url,
}

impl ServerSpec {
    /// Build the server url with the credential carried as the `apiKey` query parameter
    pub fn with_api_key(base: &str, transport: Transport, api_key: &ApiKey) -> Result<Self, url::ParseError> {
        let mut url = Url::parse(base)?;
        url.query_pairs_mut()
            .append_pair(API_KEY_PARAM, api_key.expose());
        Ok(Self { transport, url })
    }

    /// The url with every credential parameter masked, safe to log
    pub fn redacted(&self) -> String {
        let mut url = self.url.clone();
        let pairs: Vec<(String, String)> = self
            .url
            .query_pairs()
            .map(|(key, value)| {
                if key == API_KEY_PARAM {
                    (key.into_owned(), "****".to_string())
                } else {
                    (key.into_owned(), value.into_owned())
                }
            })
            .collect();
        if !pairs.is_empty() {
            url.query_pairs_mut().clear().extend_pairs(pairs);
        }
        url.to_string()
    }
}

impl fmt::Debug for ServerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerSpec")
            .field("transport", &self.transport)
            .field("url", &self.redacted())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelSpec {
    pub model: String,
    pub api_key: ApiKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentBlueprint {
    pub servers: BTreeMap<String, ServerSpec>,
    pub model: ModelSpec,
    pub instructions: String,
}

impl AgentBlueprint {
    /// Assemble the blueprint, failing on the first absent credential
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let model_key = settings
            .model_api_key()
            .ok_or_else(|| missing(GOOGLE_API_KEY))?;
        let search_key = settings
            .search_api_key()
            .ok_or_else(|| missing(LINKUP_API_KEY))?;

        let search = ServerSpec::with_api_key(&settings.search.url, settings.search.transport, search_key)
            .map_err(|e| {
                ConfigError::Other(config::ConfigError::Message(format!(
                    "invalid search url {}: {}",
                    settings.search.url, e
                )))
            })?;

        let mut servers = BTreeMap::new();
        servers.insert(settings.search.name.clone(), search);

        Ok(Self {
            servers,
            model: ModelSpec {
                model: settings.model.name.clone(),
                api_key: model_key.clone(),
            },
            instructions: settings.instructions.clone(),
        })
    }
}

fn missing(env_var: &str) -> ConfigError {
    ConfigError::MissingEnvVar {
        env_var: env_var.to_string(),
    }
}

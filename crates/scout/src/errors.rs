use std::time::Duration;
use thiserror::Error;

/// Failures surfaced by the agent bridge. The `Display` text is meant to be shown to users.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("Failed to initialize agent: {0}")]
    Initialization(String),

    #[error("Agent not initialized")]
    NotInitialized,

    #[error("Error running agent: {0}")]
    Invocation(String),

    #[error("Agent did not answer within {0:?}")]
    Timeout(Duration),
}

impl BridgeError {
    pub(crate) fn initialization(err: impl Into<anyhow::Error>) -> Self {
        BridgeError::Initialization(format!("{:#}", err.into()))
    }

    pub(crate) fn invocation(err: anyhow::Error) -> Self {
        BridgeError::Invocation(format!("{:#}", err))
    }
}

pub type BridgeResult<T> = Result<T, BridgeError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {env_var}")]
    MissingEnvVar { env_var: String },

    #[error("Failed to load env file {path}: {reason}")]
    EnvFile { path: String, reason: String },

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Other(#[from] config::ConfigError),
}

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

use crate::blueprint::AgentBlueprint;
use crate::models::envelope::ResponseEnvelope;
use crate::models::message::Message;

/// A constructed agent, ready to take conversations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AgentHandle: Send + Sync {
    /// Run the agent over the given messages and return everything it produced
    async fn invoke(&self, messages: &[Message]) -> Result<ResponseEnvelope>;
}

/// Constructs agents. Construction is expensive and talks to remote services.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AgentFactory: Send + Sync {
    async fn build(&self, blueprint: &AgentBlueprint) -> Result<Arc<dyn AgentHandle>>;
}

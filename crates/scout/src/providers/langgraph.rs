//! Client for an agent server that hosts the deep agent graph and speaks the
//! LangGraph server API: assistants are created once from a blueprint, then
//! each question runs statelessly against that assistant.
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use super::utils::{langgraph_state_to_envelope, messages_to_langgraph_spec};
use crate::backend::{AgentFactory, AgentHandle};
use crate::blueprint::AgentBlueprint;
use crate::config::AgentSettings;
use crate::models::envelope::ResponseEnvelope;
use crate::models::message::Message;

pub struct LangGraphFactory {
    client: Client,
    host: String,
    graph_id: String,
}

impl LangGraphFactory {
    pub fn new<H: Into<String>, G: Into<String>>(host: H, graph_id: G) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()?;

        Ok(Self {
            client,
            host: host.into(),
            graph_id: graph_id.into(),
        })
    }

    pub fn from_settings(settings: &AgentSettings) -> Result<Self> {
        Self::new(settings.host.clone(), settings.graph_id.clone())
    }
}

#[async_trait]
impl AgentFactory for LangGraphFactory {
    async fn build(&self, blueprint: &AgentBlueprint) -> Result<Arc<dyn AgentHandle>> {
        let payload = json!({
            "graph_id": self.graph_id,
            "config": {
                "configurable": {
                    "model": blueprint.model.model,
                    "model_api_key": blueprint.model.api_key,
                    "servers": blueprint.servers,
                    "instructions": blueprint.instructions,
                }
            },
            "metadata": { "created_by": "scout" }
        });

        let response = post(&self.client, &endpoint(&self.host, "assistants"), &payload)
            .await
            .context("Failed to create assistant")?;
        let assistant_id = response
            .get("assistant_id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow!("Assistant response has no assistant_id: {}", response))?;

        tracing::debug!(assistant_id, graph_id = %self.graph_id, "Created assistant");
        Ok(Arc::new(LangGraphAgent {
            client: self.client.clone(),
            host: self.host.clone(),
            assistant_id: assistant_id.to_string(),
        }))
    }
}

pub struct LangGraphAgent {
    client: Client,
    host: String,
    assistant_id: String,
}

impl LangGraphAgent {
    pub fn assistant_id(&self) -> &str {
        &self.assistant_id
    }
}

#[async_trait]
impl AgentHandle for LangGraphAgent {
    async fn invoke(&self, messages: &[Message]) -> Result<ResponseEnvelope> {
        let payload = json!({
            "assistant_id": self.assistant_id,
            "input": { "messages": messages_to_langgraph_spec(messages) },
        });

        let state = post(&self.client, &endpoint(&self.host, "runs/wait"), &payload).await?;
        langgraph_state_to_envelope(state)
    }
}

fn endpoint(host: &str, path: &str) -> String {
    format!("{}/{}", host.trim_end_matches('/'), path)
}

async fn post(client: &Client, url: &str, payload: &Value) -> Result<Value> {
    let response = client
        .post(url)
        .json(payload)
        .send()
        .await
        .with_context(|| format!("Could not reach agent server at {}", url))?;

    let status = response.status();
    if status.is_success() {
        Ok(response.json().await?)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(anyhow!("Request to {} failed: {} {}", url, status, body))
    }
}

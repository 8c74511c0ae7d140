use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::envelope::ResponseEnvelope;
use crate::models::message::{Message, MessageContent};
use crate::models::role::Role;

#[derive(Debug, Deserialize)]
struct WireMessage {
    #[serde(rename = "type", alias = "role")]
    kind: String,
    #[serde(default)]
    content: WireContent,
    // Chat-style records send an explicit null when there are no calls.
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
enum WireContent {
    Text(String),
    Blocks(Vec<Value>),
    #[default]
    Empty,
}

#[derive(Debug, Deserialize)]
struct WireToolCall {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(default)]
    args: Value,
}

/// Convert internal messages to the agent host's message format
pub fn messages_to_langgraph_spec(messages: &[Message]) -> Vec<Value> {
    messages
        .iter()
        .map(|message| {
            let mut converted = json!({
                "type": message.role.as_wire(),
                "content": message.text().unwrap_or_default(),
            });

            let tool_calls: Vec<Value> = message
                .tool_requests()
                .map(|request| {
                    json!({
                        "id": request.id,
                        "name": request.name,
                        "args": request.arguments,
                    })
                })
                .collect();
            if !tool_calls.is_empty() {
                converted["tool_calls"] = json!(tool_calls);
            }
            converted
        })
        .collect()
}

/// Decode the final state of a run into a response envelope
pub fn langgraph_state_to_envelope(state: Value) -> Result<ResponseEnvelope> {
    if let Some(error) = state.get("__error__") {
        let detail = error
            .get("message")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(anyhow!("Agent run failed: {}", detail));
    }

    let raw_messages = state
        .get("messages")
        .and_then(|v| v.as_array())
        .ok_or_else(|| anyhow!("Agent response has no messages: {}", state))?;

    let mut messages = Vec::with_capacity(raw_messages.len());
    for (index, raw) in raw_messages.iter().enumerate() {
        let wire: WireMessage = serde_json::from_value(raw.clone())
            .with_context(|| format!("Malformed message at index {}", index))?;
        match wire_to_message(wire) {
            Some(message) => messages.push(message),
            None => tracing::debug!("Skipping message of unknown kind at index {}", index),
        }
    }
    Ok(ResponseEnvelope::new(messages))
}

fn wire_to_message(wire: WireMessage) -> Option<Message> {
    let role = Role::from_wire(&wire.kind)?;
    let mut content = Vec::new();

    match wire.content {
        WireContent::Text(text) => {
            if !text.is_empty() {
                content.push(MessageContent::text(text));
            }
        }
        WireContent::Blocks(blocks) => {
            content.extend(blocks.iter().filter_map(block_text).map(MessageContent::text));
        }
        WireContent::Empty => {}
    }

    for (index, call) in wire.tool_calls.unwrap_or_default().into_iter().enumerate() {
        let id = call.id.unwrap_or_else(|| format!("call_{}", index));
        content.push(MessageContent::tool_request(id, call.name, call.args));
    }

    Some(Message {
        role,
        created: chrono::Utc::now().timestamp(),
        content,
    })
}

// Blocks are either bare strings or objects; only text blocks carry answer text.
fn block_text(block: &Value) -> Option<String> {
    if let Some(text) = block.as_str() {
        return Some(text.to_string());
    }
    let kind = block.get("type").and_then(|v| v.as_str()).unwrap_or("text");
    if kind != "text" {
        return None;
    }
    block
        .get("text")
        .and_then(|v| v.as_str())
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

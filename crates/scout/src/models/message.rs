use super::role::Role;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRequest {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
/// Content passed inside a message, which can be both simple text and tool calls
pub enum MessageContent {
    Text(TextContent),
    ToolRequest(ToolRequest),
}

impl MessageContent {
    pub fn text<S: Into<String>>(text: S) -> Self {
        MessageContent::Text(TextContent { text: text.into() })
    }

    pub fn tool_request<S: Into<String>, N: Into<String>>(id: S, name: N, arguments: Value) -> Self {
        MessageContent::ToolRequest(ToolRequest {
            id: id.into(),
            name: name.into(),
            arguments,
        })
    }

    /// Get the text content if this is a TextContent variant
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(text) => Some(&text.text),
            _ => None,
        }
    }

    pub fn as_tool_request(&self) -> Option<&ToolRequest> {
        if let MessageContent::ToolRequest(ref tool_request) = self {
            Some(tool_request)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A message to or from the agent
pub struct Message {
    pub role: Role,
    pub created: i64,
    pub content: Vec<MessageContent>,
}

impl Message {
    fn with_role(role: Role) -> Self {
        Message {
            role,
            created: Utc::now().timestamp(),
            content: Vec::new(),
        }
    }

    /// Create a new user message with the current timestamp
    pub fn user() -> Self {
        Self::with_role(Role::User)
    }

    /// Create a new assistant message with the current timestamp
    pub fn assistant() -> Self {
        Self::with_role(Role::Assistant)
    }

    pub fn system() -> Self {
        Self::with_role(Role::System)
    }

    pub fn tool() -> Self {
        Self::with_role(Role::Tool)
    }

    /// Add any MessageContent to the message
    pub fn with_content(mut self, content: MessageContent) -> Self {
        self.content.push(content);
        self
    }

    /// Add text content to the message
    pub fn with_text<S: Into<String>>(self, text: S) -> Self {
        self.with_content(MessageContent::text(text))
    }

    /// Add a tool request to the message
    pub fn with_tool_request<S: Into<String>, N: Into<String>>(
        self,
        id: S,
        name: N,
        arguments: Value,
    ) -> Self {
        self.with_content(MessageContent::tool_request(id, name, arguments))
    }

    /// The text payload: every text part joined in order, `None` if there is no text
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .content
            .iter()
            .filter_map(MessageContent::as_text)
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }

    pub fn tool_requests(&self) -> impl Iterator<Item = &ToolRequest> {
        self.content.iter().filter_map(MessageContent::as_tool_request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_joins_parts_in_order() {
        let message = Message::assistant().with_text("Hello, ").with_text("world");
        assert_eq!(message.text().as_deref(), Some("Hello, world"));
    }

    #[test]
    fn test_text_is_none_without_text_parts() {
        let message =
            Message::assistant().with_tool_request("call_1", "search", json!({"q": "rust"}));
        assert_eq!(message.text(), None);
        assert_eq!(Message::assistant().with_text("").text(), None);
    }

    #[test]
    fn test_tool_requests_are_exposed() {
        let message = Message::assistant()
            .with_text("Looking that up")
            .with_tool_request("call_1", "search", json!({"q": "rust"}));

        let requests: Vec<_> = message.tool_requests().collect();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].name, "search");
        assert_eq!(requests[0].arguments, json!({"q": "rust"}));
    }

    #[test]
    fn test_content_serializes_with_type_tag() {
        let value = serde_json::to_value(MessageContent::text("hi")).unwrap();
        assert_eq!(value, json!({"type": "text", "text": "hi"}));
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Who authored a message
pub enum Role {
    User,
    Assistant,
    System,
    Tool,
}

impl Role {
    /// Map a wire discriminant onto a role, `None` for kinds we do not model
    pub fn from_wire(kind: &str) -> Option<Self> {
        match kind {
            "human" | "user" => Some(Role::User),
            "ai" | "assistant" | "AIMessageChunk" => Some(Role::Assistant),
            "system" => Some(Role::System),
            "tool" | "function" => Some(Role::Tool),
            _ => None,
        }
    }

    /// The discriminant the agent host expects for this role
    pub fn as_wire(&self) -> &'static str {
        match self {
            Role::User => "human",
            Role::Assistant => "ai",
            Role::System => "system",
            Role::Tool => "tool",
        }
    }
}

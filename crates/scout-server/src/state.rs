use std::sync::Arc;

use scout::bridge::AgentBridge;

/// Shared application state. Every request sees the same bridge, and so the same agent.
#[derive(Clone)]
pub struct AppState {
    pub bridge: Arc<AgentBridge>,
}

impl AppState {
    pub fn new(bridge: Arc<AgentBridge>) -> Self {
        Self { bridge }
    }
}

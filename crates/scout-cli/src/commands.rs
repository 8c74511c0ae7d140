use std::sync::Arc;

use anyhow::{Context, Result};
use scout::bridge::BlockingBridge;
use scout::config::Settings;
use scout::providers::langgraph::LangGraphFactory;

pub mod check;
pub mod run;
pub mod session;

/// Wire the LangGraph backend into a bridge this thread can block on
fn build_bridge(settings: Settings) -> Result<BlockingBridge> {
    let factory = LangGraphFactory::from_settings(&settings.agent)
        .context("Failed to set up the agent server client")?;
    BlockingBridge::from_parts(Arc::new(factory), settings)
        .context("Failed to start the bridge runtime")
}

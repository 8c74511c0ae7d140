use std::sync::Arc;

use scout::bridge::AgentBridge;
use scout::providers::langgraph::LangGraphFactory;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod configuration;
mod error;
mod routes;
mod state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Agent settings load the env file, so they come first.
    let agent_settings = scout::config::Settings::new()?;
    let settings = configuration::Settings::new()?;

    let missing = agent_settings.missing_credentials();
    if !missing.is_empty() {
        warn!(?missing, "Missing credentials, the agent cannot be initialized");
    }

    let factory = LangGraphFactory::from_settings(&agent_settings.agent)?;
    let bridge = Arc::new(AgentBridge::new(Arc::new(factory), agent_settings));
    if let Err(e) = bridge.ensure_ready().await {
        error!("{}. Serving anyway, POST /init to retry", e);
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::configure(state::AppState::new(bridge)).layer(cors);

    let listener = tokio::net::TcpListener::bind(settings.server.address()).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

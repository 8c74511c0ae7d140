use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};

use crate::backend::{AgentFactory, AgentHandle};
use crate::blueprint::AgentBlueprint;
use crate::config::Settings;
use crate::errors::{BridgeError, BridgeResult};
use crate::models::answer::Answer;
use crate::models::message::Message;

pub mod blocking;

pub use blocking::BlockingBridge;

/// AgentBridge owns the one agent handle of a host and turns questions into answers.
///
/// The handle is built lazily by [`AgentBridge::ensure_ready`] and kept for the
/// lifetime of the bridge. Callers already running inside a tokio runtime await
/// these methods directly; synchronous callers go through [`BlockingBridge`].
pub struct AgentBridge {
    factory: Arc<dyn AgentFactory>,
    settings: Settings,
    handle: OnceCell<Arc<dyn AgentHandle>>,
    // Held for the duration of a construction attempt.
    init: Mutex<Option<BridgeError>>,
    // Finished construction attempts, bumped while `init` is held.
    attempts: AtomicU64,
    // One question at a time per handle.
    turn: Mutex<()>,
}

impl AgentBridge {
    pub fn new(factory: Arc<dyn AgentFactory>, settings: Settings) -> Self {
        Self {
            factory,
            settings,
            handle: OnceCell::new(),
            init: Mutex::new(None),
            attempts: AtomicU64::new(0),
            turn: Mutex::new(()),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_ready(&self) -> bool {
        self.handle.initialized()
    }

    /// Build the agent unless it already exists.
    ///
    /// Callers that arrive while a construction is in flight wait for it and
    /// share its outcome, success or failure. A failed construction leaves the
    /// bridge empty and is never retried here; a later call to `ensure_ready`
    /// makes a fresh attempt.
    pub async fn ensure_ready(&self) -> BridgeResult<()> {
        if self.handle.initialized() {
            return Ok(());
        }

        let seen = self.attempts.load(Ordering::SeqCst);
        let mut last_error = self.init.lock().await;
        if self.handle.initialized() {
            return Ok(());
        }
        if self.attempts.load(Ordering::SeqCst) != seen {
            // An attempt finished while we waited and it failed.
            if let Some(err) = last_error.as_ref() {
                return Err(err.clone());
            }
        }

        let result = self.construct().await;
        self.attempts.fetch_add(1, Ordering::SeqCst);
        match result {
            Ok(handle) => {
                *last_error = None;
                if self.handle.set(handle).is_err() {
                    debug!("Agent handle was already set");
                }
                Ok(())
            }
            Err(err) => {
                *last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    async fn construct(&self) -> BridgeResult<Arc<dyn AgentHandle>> {
        let blueprint = AgentBlueprint::from_settings(&self.settings).map_err(|e| {
            let err = BridgeError::initialization(e);
            warn!("{}", err);
            err
        })?;

        info!(
            model = %blueprint.model.model,
            servers = ?blueprint.servers,
            "Initializing agent"
        );
        let started = Instant::now();
        match self.factory.build(&blueprint).await {
            Ok(handle) => {
                info!(elapsed = ?started.elapsed(), "Agent ready");
                Ok(handle)
            }
            Err(e) => {
                let err = BridgeError::initialization(e);
                warn!("{}", err);
                Err(err)
            }
        }
    }

    /// Ask the agent a single question, honouring the configured timeout if there is one
    pub async fn ask(&self, query: &str) -> BridgeResult<Answer> {
        match self.settings.agent.timeout_secs {
            Some(secs) => {
                self.ask_with_timeout(query, Duration::from_secs(secs))
                    .await
            }
            None => self.ask_once(query).await,
        }
    }

    /// Ask with an explicit deadline. Expiry leaves the handle in place for the next question.
    pub async fn ask_with_timeout(&self, query: &str, limit: Duration) -> BridgeResult<Answer> {
        match tokio::time::timeout(limit, self.ask_once(query)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(?limit, "Agent did not answer in time");
                Err(BridgeError::Timeout(limit))
            }
        }
    }

    async fn ask_once(&self, query: &str) -> BridgeResult<Answer> {
        let handle = self.handle.get().ok_or(BridgeError::NotInitialized)?;
        let _turn = self.turn.lock().await;

        let started = Instant::now();
        let messages = [Message::user().with_text(query)];
        let envelope = handle.invoke(&messages).await.map_err(|e| {
            let err = BridgeError::invocation(e);
            warn!("{}", err);
            err
        })?;
        debug!(
            elapsed = ?started.elapsed(),
            messages = envelope.messages.len(),
            "Agent replied"
        );

        let answer = envelope.answer();
        if answer.is_empty() {
            warn!("Agent reply contained no assistant text");
        }
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MockAgentFactory, MockAgentHandle};
    use crate::config::GOOGLE_API_KEY;
    use crate::models::envelope::ResponseEnvelope;
    use crate::models::role::Role;
    use anyhow::anyhow;

    fn settings() -> Settings {
        Settings::default()
            .with_model_api_key("google-key")
            .with_search_api_key("linkup-key")
    }

    fn factory_for(handle: MockAgentHandle) -> MockAgentFactory {
        let mut factory = MockAgentFactory::new();
        factory
            .expect_build()
            .times(1)
            .return_once(move |_| Ok(Arc::new(handle) as Arc<dyn AgentHandle>));
        factory
    }

    #[tokio::test]
    async fn test_ensure_ready_builds_once() -> anyhow::Result<()> {
        let bridge = AgentBridge::new(Arc::new(factory_for(MockAgentHandle::new())), settings());
        assert!(!bridge.is_ready());

        for _ in 0..3 {
            bridge.ensure_ready().await?;
        }
        assert!(bridge.is_ready());
        Ok(())
    }

    #[tokio::test]
    async fn test_ensure_ready_passes_blueprint() -> anyhow::Result<()> {
        let mut factory = MockAgentFactory::new();
        factory
            .expect_build()
            .withf(|blueprint| {
                blueprint.model.api_key.expose() == "google-key"
                    && blueprint
                        .servers
                        .values()
                        .all(|server| server.url.as_str().ends_with("apiKey=linkup-key"))
            })
            .times(1)
            .return_once(|_| Ok(Arc::new(MockAgentHandle::new()) as Arc<dyn AgentHandle>));

        let bridge = AgentBridge::new(Arc::new(factory), settings());
        bridge.ensure_ready().await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_ask_before_ready_never_reaches_backend() {
        let mut factory = MockAgentFactory::new();
        factory.expect_build().times(0);

        let bridge = AgentBridge::new(Arc::new(factory), settings());
        assert_eq!(bridge.ask("hello").await, Err(BridgeError::NotInitialized));
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_initialization() {
        let mut factory = MockAgentFactory::new();
        factory.expect_build().times(0);

        let bridge = AgentBridge::new(
            Arc::new(factory),
            Settings::default().with_search_api_key("linkup-key"),
        );
        let err = bridge.ensure_ready().await.unwrap_err();

        assert!(matches!(err, BridgeError::Initialization(ref cause) if cause.contains(GOOGLE_API_KEY)));
        assert!(!bridge.is_ready());
        assert_eq!(bridge.ask("hello").await, Err(BridgeError::NotInitialized));
    }

    #[tokio::test]
    async fn test_failed_construction_is_reported_then_retried_on_request() -> anyhow::Result<()> {
        let mut attempts = 0;
        let mut factory = MockAgentFactory::new();
        factory.expect_build().times(2).returning(move |_| {
            attempts += 1;
            if attempts == 1 {
                Err(anyhow!("401 Unauthorized"))
            } else {
                Ok(Arc::new(MockAgentHandle::new()) as Arc<dyn AgentHandle>)
            }
        });

        let bridge = AgentBridge::new(Arc::new(factory), settings());
        assert_eq!(
            bridge.ensure_ready().await,
            Err(BridgeError::Initialization("401 Unauthorized".to_string()))
        );
        assert!(!bridge.is_ready());

        bridge.ensure_ready().await?;
        assert!(bridge.is_ready());
        Ok(())
    }

    #[tokio::test]
    async fn test_ask_concatenates_assistant_text() -> anyhow::Result<()> {
        let mut handle = MockAgentHandle::new();
        handle
            .expect_invoke()
            .withf(|messages| {
                messages.len() == 1
                    && messages[0].role == Role::User
                    && messages[0].text().as_deref() == Some("hello")
            })
            .times(1)
            .returning(|_| {
                Ok(ResponseEnvelope::new(vec![
                    Message::user().with_text("x"),
                    Message::assistant().with_text("A"),
                    Message::assistant().with_text("B"),
                    Message::assistant().with_text(""),
                ]))
            });

        let bridge = AgentBridge::new(Arc::new(factory_for(handle)), settings());
        bridge.ensure_ready().await?;

        assert_eq!(bridge.ask("hello").await?.as_str(), "AB");
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_reply_is_not_an_error() -> anyhow::Result<()> {
        let mut handle = MockAgentHandle::new();
        handle
            .expect_invoke()
            .times(1)
            .returning(|_| Ok(ResponseEnvelope::new(vec![Message::tool().with_text("raw")])));

        let bridge = AgentBridge::new(Arc::new(factory_for(handle)), settings());
        bridge.ensure_ready().await?;

        let answer = bridge.ask("hello").await?;
        assert!(answer.is_empty());
        assert_eq!(answer.display_text(), crate::models::answer::NO_ANSWER);
        Ok(())
    }

    #[tokio::test]
    async fn test_invocation_failure_keeps_handle() -> anyhow::Result<()> {
        let mut calls = 0;
        let mut handle = MockAgentHandle::new();
        handle.expect_invoke().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Err(anyhow!("search server closed the stream"))
            } else {
                Ok(ResponseEnvelope::new(vec![Message::assistant().with_text("recovered")]))
            }
        });

        let bridge = AgentBridge::new(Arc::new(factory_for(handle)), settings());
        bridge.ensure_ready().await?;

        let err = bridge.ask("first").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error running agent: search server closed the stream"
        );
        assert!(bridge.is_ready());

        assert_eq!(bridge.ask("second").await?.as_str(), "recovered");
        Ok(())
    }
}

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::backend::{AgentFactory, AgentHandle};
use crate::blueprint::AgentBlueprint;
use crate::models::envelope::ResponseEnvelope;
use crate::models::message::Message;

/// An agent that replays pre-configured replies, for testing hosts without a network
pub struct MockAgent {
    replies: Mutex<VecDeque<Result<ResponseEnvelope>>>,
    queries: Mutex<Vec<String>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockAgent {
    pub fn new(replies: Vec<Result<ResponseEnvelope>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            queries: Mutex::new(Vec::new()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// One successful reply per text, each a single assistant message
    pub fn answering(texts: &[&str]) -> Self {
        Self::new(
            texts
                .iter()
                .map(|text| Ok(ResponseEnvelope::new(vec![Message::assistant().with_text(*text)])))
                .collect(),
        )
    }

    /// Wait this long before every reply
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The user text of every invocation so far
    pub fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .map(|queries| queries.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AgentHandle for MockAgent {
    async fn invoke(&self, messages: &[Message]) -> Result<ResponseEnvelope> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut queries) = self.queries.lock() {
            queries.extend(messages.iter().filter_map(Message::text));
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let mut replies = self
            .replies
            .lock()
            .map_err(|_| anyhow!("mock agent replies poisoned"))?;
        // Return an empty envelope once the script runs out
        replies.pop_front().unwrap_or_else(|| Ok(ResponseEnvelope::default()))
    }
}

/// A factory that hands out one shared [`MockAgent`] and counts constructions
pub struct MockFactory {
    agent: Arc<MockAgent>,
    failure: Option<String>,
    delay: Option<Duration>,
    builds: AtomicUsize,
}

impl MockFactory {
    pub fn new(agent: MockAgent) -> Self {
        Self {
            agent: Arc::new(agent),
            failure: None,
            delay: None,
            builds: AtomicUsize::new(0),
        }
    }

    /// A factory whose every construction fails with `reason`
    pub fn failing<S: Into<String>>(reason: S) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::new(MockAgent::new(Vec::new()))
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn agent(&self) -> &Arc<MockAgent> {
        &self.agent
    }

    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AgentFactory for MockFactory {
    async fn build(&self, _blueprint: &AgentBlueprint) -> Result<Arc<dyn AgentHandle>> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(reason) => Err(anyhow!(reason.clone())),
            None => Ok(self.agent.clone()),
        }
    }
}

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tokio::runtime::{Builder, Handle, Runtime, RuntimeFlavor};
use tracing::debug;

use super::AgentBridge;
use crate::backend::AgentFactory;
use crate::config::Settings;
use crate::errors::BridgeResult;
use crate::models::answer::Answer;

/// Synchronous entry point to an [`AgentBridge`].
///
/// Every call is driven to completion on a runtime owned by this value, so the
/// agent handle and its connections always live on the same scheduler. Calls made
/// from code that is itself running inside a tokio runtime are moved onto a helper
/// thread instead of nesting `block_on`, which tokio forbids.
pub struct BlockingBridge {
    bridge: Arc<AgentBridge>,
    runtime: Option<Runtime>,
}

impl BlockingBridge {
    pub fn new(bridge: Arc<AgentBridge>) -> io::Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("scout-bridge")
            .enable_all()
            .build()?;

        Ok(Self {
            bridge,
            runtime: Some(runtime),
        })
    }

    pub fn from_parts(factory: Arc<dyn AgentFactory>, settings: Settings) -> io::Result<Self> {
        Self::new(Arc::new(AgentBridge::new(factory, settings)))
    }

    /// The awaitable bridge behind this one, for callers that also run async code
    pub fn bridge(&self) -> &Arc<AgentBridge> {
        &self.bridge
    }

    pub fn is_ready(&self) -> bool {
        self.bridge.is_ready()
    }

    pub fn ensure_ready(&self) -> BridgeResult<()> {
        self.block_on(self.bridge.ensure_ready())
    }

    pub fn ask(&self, query: &str) -> BridgeResult<Answer> {
        self.block_on(self.bridge.ask(query))
    }

    pub fn ask_with_timeout(&self, query: &str, limit: Duration) -> BridgeResult<Answer> {
        self.block_on(self.bridge.ask_with_timeout(query, limit))
    }

    fn block_on<F>(&self, future: F) -> F::Output
    where
        F: Future + Send,
        F::Output: Send,
    {
        let runtime = self
            .runtime
            .as_ref()
            .expect("runtime is only taken on drop");

        let caller = match Handle::try_current() {
            Ok(caller) => caller,
            Err(_) => return runtime.block_on(future),
        };

        debug!("Blocking bridge called from inside a runtime, driving on a helper thread");
        let drive = move || {
            thread::scope(|scope| {
                match scope.spawn(move || runtime.block_on(future)).join() {
                    Ok(output) => output,
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            })
        };

        match caller.runtime_flavor() {
            // Let the caller's other tasks move to another worker while we wait.
            RuntimeFlavor::MultiThread => tokio::task::block_in_place(drive),
            _ => drive(),
        }
    }
}

impl Drop for BlockingBridge {
    fn drop(&mut self) {
        // A plain drop blocks, which panics when the owner is dropped inside async code.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

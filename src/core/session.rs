//! A ready-to-run pairing of the change source and the execution trigger.

use crate::core::WatchSessionBuilder;
use crate::error::Result;
use crate::trigger::ExecutionTrigger;
use crate::watch::ChangeSource;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;

/// Watches one file and reruns it through its interpreter on every change.
///
/// The interpreter is resolved while building; after that the trigger is
/// shared read-only between overlapping runs.
///
/// # Examples
///
/// ```rust,no_run
/// use hotrun::prelude::*;
///
/// # async fn example() -> Result<()> {
/// let session = WatchSession::builder().with_file("script.py").build()?;
/// println!("using {}", session.trigger().interpreter());
/// session.run().await
/// # }
/// ```
pub struct WatchSession {
    source: ChangeSource,
    trigger: Arc<ExecutionTrigger>,
}

impl WatchSession {
    /// Create a new builder for constructing a session.
    pub fn builder() -> WatchSessionBuilder {
        WatchSessionBuilder::new()
    }

    pub(crate) fn new(source: ChangeSource, trigger: Arc<ExecutionTrigger>) -> Self {
        Self { source, trigger }
    }

    /// Watched file (absolute).
    pub fn path(&self) -> &Path {
        self.source.path()
    }

    /// Trigger fired on every change.
    pub fn trigger(&self) -> &ExecutionTrigger {
        &self.trigger
    }

    /// Watch until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error: the watched file becoming inaccessible
    /// or the interpreter failing to start.
    pub async fn run(self) -> Result<()> {
        let trigger = self.trigger;
        self.source.watch(reload_with(trigger)).await
    }

    /// Watch until `shutdown` completes.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    pub async fn run_until<S>(self, shutdown: S) -> Result<()>
    where
        S: Future<Output = ()>,
    {
        let trigger = self.trigger;
        self.source.watch_until(reload_with(trigger), shutdown).await
    }
}

fn reload_with(
    trigger: Arc<ExecutionTrigger>,
) -> impl Fn() -> std::pin::Pin<Box<dyn Future<Output = Result<()>> + Send>> {
    move || {
        let trigger = Arc::clone(&trigger);
        Box::pin(async move { trigger.run_once().await.map(|_| ()) })
    }
}

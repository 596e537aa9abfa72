//! Task manager for async effects
//!
//! Effects that need I/O are spawned as tokio tasks. Each task resolves to a
//! result action that is sent back to the runtime's action channel and handled
//! in a fresh dispatch cycle, never inside the dispatch that spawned it.
//!
//! Issued tasks are never cancelled: once spawned, a task runs to completion
//! and its result action is delivered (or dropped if the runtime is gone).
//!
//! ```ignore
//! tasks.spawn(TaskKey::new("GET /v1/earner/badges"), async move {
//!     match transport.send(request).await {
//!         Ok(response) => AppAction::ApiGetDataDidLoad { .. },
//!         Err(e) => AppAction::ApiGetDataDidFail { .. },
//!     }
//! });
//! ```

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::Action;

/// Label of a spawned task, used for logging.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TaskKey(String);

impl TaskKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for TaskKey {
    fn from(s: &'static str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TaskKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Decrements the in-flight counter when the task finishes or panics.
struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Spawns effect tasks and tracks how many are still running.
///
/// # Type Parameters
///
/// - `A`: The action type that tasks produce
pub struct TaskManager<A> {
    action_tx: mpsc::UnboundedSender<A>,
    in_flight: Arc<AtomicUsize>,
}

impl<A> TaskManager<A>
where
    A: Action,
{
    /// `action_tx` receives the result action of every task.
    pub fn new(action_tx: mpsc::UnboundedSender<A>) -> Self {
        Self {
            action_tx,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Spawn a task whose output action is sent to the action channel.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(&mut self, key: impl Into<TaskKey>, future: F) -> &mut Self
    where
        F: Future<Output = A> + Send + 'static,
    {
        let key = key.into();
        let tx = self.action_tx.clone();
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let guard = InFlightGuard(self.in_flight.clone());

        debug!(task = %key, "Spawning task");
        tokio::spawn(async move {
            let action = future.await;
            // Send before the guard drops so idle detection never misses it
            if tx.send(action).is_err() {
                debug!(task = %key, "Action channel closed, dropping task result");
            }
            drop(guard);
        });
        self
    }

    /// Number of spawned tasks that have not delivered their action yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight() == 0
    }

    /// Sender used for task results.
    pub fn sender(&self) -> mpsc::UnboundedSender<A> {
        self.action_tx.clone()
    }
}

//! Middleware observing dispatches

use crate::action::{ActionCategory, ActionSummary};
use crate::Action;

/// Middleware trait for intercepting actions
///
/// Implement this trait to add logging, recording, or other cross-cutting
/// concerns to a [`Dispatcher`](crate::Dispatcher).
pub trait Middleware<A: Action> {
    /// Called before any handler sees the action
    fn before(&mut self, action: &A);

    /// Called after every handler processed the action
    fn after(&mut self, action: &A, state_changed: bool);
}

/// A no-op middleware that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMiddleware;

impl<A: Action> Middleware<A> for NoopMiddleware {
    fn before(&mut self, _action: &A) {}
    fn after(&mut self, _action: &A, _state_changed: bool) {}
}

/// Middleware that logs actions through `tracing`
#[derive(Debug, Clone, Default)]
pub struct LoggingMiddleware {
    /// Whether to log before dispatch
    pub log_before: bool,
    /// Whether to log after dispatch
    pub log_after: bool,
}

impl LoggingMiddleware {
    /// Log after dispatch only
    pub fn new() -> Self {
        Self {
            log_before: false,
            log_after: true,
        }
    }

    /// Log both before and after
    pub fn verbose() -> Self {
        Self {
            log_before: true,
            log_after: true,
        }
    }
}

impl<A: ActionSummary + ActionCategory> Middleware<A> for LoggingMiddleware {
    fn before(&mut self, action: &A) {
        if self.log_before {
            tracing::debug!(
                action = %action.name(),
                category = action.category().unwrap_or("none"),
                summary = %action.summary(),
                "Dispatching action"
            );
        }
    }

    fn after(&mut self, action: &A, state_changed: bool) {
        if self.log_after {
            tracing::debug!(
                action = %action.name(),
                category = action.category().unwrap_or("none"),
                state_changed = state_changed,
                "Action processed"
            );
        }
    }
}

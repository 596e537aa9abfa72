//! Action traits for type-safe state mutations

use std::fmt::Debug;

/// Marker trait for actions that can be dispatched to stores
///
/// Actions represent intents and results. They should be:
/// - Clone: Actions may be logged, replayed, or handed to several stores
/// - Debug: For debugging and logging
/// - Send + 'static: Async tasks send result actions back across threads
///
/// Use `#[derive(Action)]` from `badgeflow-macros` to auto-implement this trait.
pub trait Action: Clone + Debug + Send + 'static {
    /// Canonical type name of the action (e.g. `"FORM_SUBMIT"`)
    fn name(&self) -> &'static str;
}

/// Actions grouped into categories (`form`, `api`, `route`, ...)
///
/// Implemented by `#[derive(Action)]`; `#[action(infer_categories)]` derives
/// the category from the variant name.
pub trait ActionCategory: Action {
    /// Category name, `None` for uncategorized actions
    fn category(&self) -> Option<&'static str> {
        None
    }
}

/// Short, log-friendly description of an action
///
/// Data-heavy actions (bootstrap payloads, response bodies) should override
/// this so logs stay readable.
pub trait ActionSummary: Action {
    fn summary(&self) -> String {
        format!("{:?}", self)
    }
}

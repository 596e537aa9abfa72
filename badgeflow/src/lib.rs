//! badgeflow: unidirectional data flow for Open Badges web clients
//!
//! Actions flow one way: action creators queue typed actions, the dispatcher
//! hands each one to every store handler in dependency order, stores emit
//! named events, and views re-read store getters when they hear one.
//!
//! # Example
//! ```ignore
//! use badgeflow::prelude::*;
//!
//! #[derive(Action, Clone, Debug)]
//! #[action(infer_categories)]
//! enum AppAction {
//!     RouteChanged { href: String },
//!     ActiveActionCleared { view_id: String },
//! }
//!
//! assert_eq!(AppAction::RouteChanged { href: "/".into() }.name(), "ROUTE_CHANGED");
//! ```

// Re-export everything from core
pub use badgeflow_core::*;

// Re-export derive macros
pub use badgeflow_macros::Action;

// Test assertion macros
pub use badgeflow_core::{
    assert_emitted, assert_event, assert_not_emitted, count_emitted, find_emitted,
};

/// Prelude for convenient imports
pub mod prelude {
    // Traits
    pub use badgeflow_core::{Action, ActionCategory, ActionSummary};

    // Dispatch
    pub use badgeflow_core::{
        DispatchError, DispatchResult, DispatchToken, Dispatcher, Handler, LoggingMiddleware,
        Middleware, NoopMiddleware,
    };

    // Events
    pub use badgeflow_core::{drain_events, EventBus, EventName, Subscription};

    // Runtime
    pub use badgeflow_core::{Runtime, TaskKey, TaskManager};

    // Derive macros
    pub use badgeflow_macros::Action;
}

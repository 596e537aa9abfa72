//! Core traits and types for badgeflow
//!
//! This crate provides the foundational abstractions for unidirectional data
//! flow in a web client: actions are broadcast by a dispatcher to store
//! handlers, stores mutate their own state and name the events views should
//! hear about, and any I/O is declared as an effect and run as an async task
//! whose result comes back as a new action.
//!
//! # Core Concepts
//!
//! - **Action**: Intents and async results, one enum variant per action type
//! - **Dispatcher**: Synchronous broadcast to store handlers with dependency ordering
//! - **DispatchResult**: What a handler changed, which events to emit, which effects to run
//! - **EventBus**: Named events delivered to subscribed views
//! - **TaskManager** / **Runtime**: The action loop and async effect execution
//!
//! # Basic Example
//!
//! ```ignore
//! use badgeflow_core::prelude::*;
//!
//! #[derive(Action, Clone, Debug)]
//! enum MyAction {
//!     RouteChanged { href: String },
//! }
//!
//! #[derive(Default)]
//! struct Stores {
//!     route: Option<String>,
//! }
//!
//! fn route(stores: &mut Stores, action: &MyAction) -> DispatchResult<()> {
//!     match action {
//!         MyAction::RouteChanged { href } => {
//!             stores.route = Some(href.clone());
//!             DispatchResult::changed().emit("ROUTE_CHANGED")
//!         }
//!     }
//! }
//!
//! let mut dispatcher = Dispatcher::new(Stores::default());
//! dispatcher.register("route", route)?;
//! dispatcher.dispatch(MyAction::RouteChanged { href: "/issuer".into() });
//! ```
//!
//! # Async Results
//!
//! Handlers never block on I/O. An intent action (`ApiGetData`) makes a
//! handler return an effect; the effect handler spawns a task on the
//! [`TaskManager`], and the task resolves to a result action
//! (`ApiGetDataDidLoad`, `ApiGetDataDidFail`) that the [`Runtime`] queues as a
//! new dispatch cycle.

pub mod action;
pub mod bus;
pub mod dispatcher;
pub mod effect;
pub mod event;
pub mod middleware;
pub mod runtime;
pub mod tasks;
pub mod testing;

// Core trait exports
pub use action::{Action, ActionCategory, ActionSummary};

// Dispatch exports
pub use dispatcher::{DispatchError, DispatchToken, Dispatcher, Handler};
pub use effect::DispatchResult;
pub use middleware::{LoggingMiddleware, Middleware, NoopMiddleware};

// Event exports
pub use bus::{drain_events, EventBus, Subscription};
pub use event::EventName;

// Runtime exports
pub use runtime::Runtime;
pub use tasks::{TaskKey, TaskManager};

// Testing exports
pub use testing::TestHarness;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{Action, ActionCategory, ActionSummary};
    pub use crate::bus::{drain_events, EventBus, Subscription};
    pub use crate::dispatcher::{DispatchError, DispatchToken, Dispatcher, Handler};
    pub use crate::effect::DispatchResult;
    pub use crate::event::EventName;
    pub use crate::middleware::{LoggingMiddleware, Middleware, NoopMiddleware};
    pub use crate::runtime::Runtime;
    pub use crate::tasks::{TaskKey, TaskManager};
}

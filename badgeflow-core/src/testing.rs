//! Test utilities for badgeflow applications
//!
//! - [`TestHarness`]: wraps a [`Dispatcher`] and records every event and effect
//! - Assertion macros for verifying emitted effects, actions and events
//!
//! # Example
//!
//! ```ignore
//! use badgeflow::testing::TestHarness;
//!
//! let mut harness = TestHarness::new(app::dispatcher(Stores::default())?);
//! harness.dispatch(AppAction::ApiFetchCollections { keys: vec!["earner_badges".into()] });
//!
//! let effects = harness.drain_effects();
//! assert_emitted!(effects, Effect::GetData(_));
//! assert!(!harness.saw_event("DATA_UPDATED"));
//! ```

use crate::dispatcher::Dispatcher;
use crate::effect::DispatchResult;
use crate::event::EventName;
use crate::Action;

/// Dispatcher wrapper that records what handlers produced.
pub struct TestHarness<S, A: Action, E> {
    dispatcher: Dispatcher<S, A, E>,
    events: Vec<EventName>,
    effects: Vec<E>,
}

impl<S, A: Action, E> TestHarness<S, A, E> {
    pub fn new(dispatcher: Dispatcher<S, A, E>) -> Self {
        Self {
            dispatcher,
            events: Vec::new(),
            effects: Vec::new(),
        }
    }

    /// Dispatch an action and record its events and effects.
    ///
    /// Returns whether state changed.
    pub fn dispatch(&mut self, action: A) -> bool {
        let DispatchResult {
            changed,
            events,
            effects,
        } = self.dispatcher.dispatch(action);
        self.events.extend(events);
        self.effects.extend(effects);
        changed
    }

    /// Dispatch several actions in order.
    pub fn dispatch_all(&mut self, actions: impl IntoIterator<Item = A>) {
        for action in actions {
            self.dispatch(action);
        }
    }

    pub fn state(&self) -> &S {
        self.dispatcher.state()
    }

    pub fn state_mut(&mut self) -> &mut S {
        self.dispatcher.state_mut()
    }

    pub fn dispatcher(&self) -> &Dispatcher<S, A, E> {
        &self.dispatcher
    }

    /// Take every recorded event.
    pub fn drain_events(&mut self) -> Vec<EventName> {
        std::mem::take(&mut self.events)
    }

    /// Take every recorded effect.
    pub fn drain_effects(&mut self) -> Vec<E> {
        std::mem::take(&mut self.effects)
    }

    /// Whether an event with this name was recorded (without draining).
    pub fn saw_event(&self, name: &str) -> bool {
        self.events.iter().any(|e| e.as_str() == name)
    }
}

/// Assert that an item matching a pattern was emitted.
///
/// Works on any collection of effects or actions.
///
/// ```ignore
/// let effects = harness.drain_effects();
/// assert_emitted!(effects, Effect::GetData(ctx) if ctx.action_url == "/v1/earner/badges");
/// ```
#[macro_export]
macro_rules! assert_emitted {
    ($items:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $items.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected item matching `{}` to be emitted, but got: {:?}",
            stringify!($pattern),
            $items
        );
    };
}

/// Assert that no item matching a pattern was emitted.
#[macro_export]
macro_rules! assert_not_emitted {
    ($items:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            !$items.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected item matching `{}` NOT to be emitted, but it was: {:?}",
            stringify!($pattern),
            $items
        );
    };
}

/// Find the first item matching a pattern.
#[macro_export]
macro_rules! find_emitted {
    ($items:expr, $pattern:pat $(if $guard:expr)?) => {
        $items.iter().find(|a| matches!(a, $pattern $(if $guard)?))
    };
}

/// Count items matching a pattern.
#[macro_export]
macro_rules! count_emitted {
    ($items:expr, $pattern:pat $(if $guard:expr)?) => {
        $items.iter().filter(|a| matches!(a, $pattern $(if $guard)?)).count()
    };
}

/// Assert that an event name appears in a list of events.
///
/// ```ignore
/// let events = harness.drain_events();
/// assert_event!(events, "DATA_UPDATED_earner_badges");
/// ```
#[macro_export]
macro_rules! assert_event {
    ($events:expr, $name:expr) => {
        assert!(
            $events.iter().any(|e| e.as_str() == $name),
            "Expected event `{}`, but got: {:?}",
            $name,
            $events
        );
    };
}

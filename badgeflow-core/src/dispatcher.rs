//! Synchronous action dispatcher with store dependency ordering
//!
//! Every store registers one handler. A handler may declare that it must run
//! after other handlers for the same action ("wait for"), so it observes their
//! state already updated. Dependencies are declared up front and the run order
//! is a topological sort computed once per registration change, not per
//! dispatch.
//!
//! ```ignore
//! let mut dispatcher = Dispatcher::new(Stores::default());
//! let forms = dispatcher.register("forms", form_store::handle)?;
//! dispatcher.register_after("api", api_store::handle, &[forms])?;
//!
//! let result = dispatcher.dispatch(AppAction::FormSubmit { .. });
//! ```

use thiserror::Error;

use crate::effect::DispatchResult;
use crate::middleware::Middleware;
use crate::Action;

/// A store handler: inspects the action, mutates its slice of `S` and reports
/// events and effects.
pub type Handler<S, A, E> = fn(&mut S, &A) -> DispatchResult<E>;

/// Opaque handle identifying a registered handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DispatchToken(usize);

/// Wiring errors. They are programming errors and surface when the
/// application is assembled, before any action runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("store `{0}` is already registered")]
    DuplicateStore(String),
    #[error("unknown dispatch token {0:?}")]
    UnknownToken(DispatchToken),
    #[error("store `{store}` waiting for `{on}` would create a dependency cycle")]
    CyclicDependency { store: String, on: String },
}

struct Registration<S, A, E> {
    name: String,
    handler: Handler<S, A, E>,
    wait_for: Vec<DispatchToken>,
}

/// Owns the application state and broadcasts each action to every handler.
pub struct Dispatcher<S, A: Action, E> {
    state: S,
    registrations: Vec<Registration<S, A, E>>,
    order: Vec<usize>,
    middleware: Vec<Box<dyn Middleware<A>>>,
}

impl<S, A: Action, E> Dispatcher<S, A, E> {
    /// Create a dispatcher around the initial state.
    pub fn new(state: S) -> Self {
        Self {
            state,
            registrations: Vec::new(),
            order: Vec::new(),
            middleware: Vec::new(),
        }
    }

    /// Register a store handler.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        handler: Handler<S, A, E>,
    ) -> Result<DispatchToken, DispatchError> {
        let name = name.into();
        if self.registrations.iter().any(|r| r.name == name) {
            return Err(DispatchError::DuplicateStore(name));
        }

        let token = DispatchToken(self.registrations.len());
        self.registrations.push(Registration {
            name,
            handler,
            wait_for: Vec::new(),
        });
        self.order.push(token.0);
        Ok(token)
    }

    /// Register a handler that runs after each of `wait_for`.
    pub fn register_after(
        &mut self,
        name: impl Into<String>,
        handler: Handler<S, A, E>,
        wait_for: &[DispatchToken],
    ) -> Result<DispatchToken, DispatchError> {
        for token in wait_for {
            self.check_token(*token)?;
        }
        let token = self.register(name, handler)?;
        self.wait_for(token, wait_for)?;
        Ok(token)
    }

    /// Declare that `token`'s handler must run after each of `dependencies`.
    ///
    /// On error the previous ordering is left untouched.
    pub fn wait_for(
        &mut self,
        token: DispatchToken,
        dependencies: &[DispatchToken],
    ) -> Result<(), DispatchError> {
        self.check_token(token)?;
        for dependency in dependencies {
            self.check_token(*dependency)?;
        }

        let previous = self.registrations[token.0].wait_for.clone();
        for dependency in dependencies {
            if !self.registrations[token.0].wait_for.contains(dependency) {
                self.registrations[token.0].wait_for.push(*dependency);
            }
        }

        match self.compute_order() {
            Some(order) => {
                self.order = order;
                Ok(())
            }
            None => {
                self.registrations[token.0].wait_for = previous;
                let on = dependencies
                    .iter()
                    .find(|d| self.depends_on(**d, token))
                    .or(dependencies.first())
                    .map(|d| self.registrations[d.0].name.clone())
                    .unwrap_or_default();
                Err(DispatchError::CyclicDependency {
                    store: self.registrations[token.0].name.clone(),
                    on,
                })
            }
        }
    }

    /// Add middleware that observes every dispatch.
    pub fn add_middleware<M: Middleware<A> + 'static>(&mut self, middleware: M) {
        self.middleware.push(Box::new(middleware));
    }

    /// Run every handler exactly once for `action`, honoring dependencies.
    ///
    /// Events and effects are merged in handler execution order.
    pub fn dispatch(&mut self, action: A) -> DispatchResult<E> {
        for middleware in &mut self.middleware {
            middleware.before(&action);
        }

        let mut result = DispatchResult::unchanged();
        for &index in &self.order {
            let registration = &self.registrations[index];
            result.merge((registration.handler)(&mut self.state, &action));
        }

        for middleware in self.middleware.iter_mut().rev() {
            middleware.after(&action, result.changed);
        }
        result
    }

    /// Get a reference to the current state
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Get a mutable reference to the state
    ///
    /// Prefer dispatching actions. Useful for seeding state in tests.
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// Token of a registered store.
    pub fn token(&self, name: &str) -> Option<DispatchToken> {
        self.registrations
            .iter()
            .position(|r| r.name == name)
            .map(DispatchToken)
    }

    /// Store names in the order their handlers run.
    pub fn handler_order(&self) -> Vec<&str> {
        self.order
            .iter()
            .map(|&i| self.registrations[i].name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    fn check_token(&self, token: DispatchToken) -> Result<(), DispatchError> {
        if token.0 < self.registrations.len() {
            Ok(())
        } else {
            Err(DispatchError::UnknownToken(token))
        }
    }

    /// Whether `from` (transitively) waits for `to`.
    fn depends_on(&self, from: DispatchToken, to: DispatchToken) -> bool {
        let mut stack = vec![from];
        let mut seen = vec![false; self.registrations.len()];
        while let Some(current) = stack.pop() {
            if current == to {
                return true;
            }
            if std::mem::replace(&mut seen[current.0], true) {
                continue;
            }
            stack.extend(self.registrations[current.0].wait_for.iter().copied());
        }
        false
    }

    /// Topological order, ties broken by registration order. `None` on a cycle.
    fn compute_order(&self) -> Option<Vec<usize>> {
        let count = self.registrations.len();
        let mut done = vec![false; count];
        let mut order = Vec::with_capacity(count);

        while order.len() < count {
            let next = (0..count).find(|&i| {
                !done[i]
                    && self.registrations[i]
                        .wait_for
                        .iter()
                        .all(|dependency| done[dependency.0])
            })?;
            done[next] = true;
            order.push(next);
        }
        Some(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct TestState {
        forms_submitted: u32,
        api_saw_submitted: Vec<u32>,
        trace: Vec<&'static str>,
    }

    #[derive(Clone, Debug)]
    enum TestAction {
        Submit,
        Ping,
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            match self {
                TestAction::Submit => "SUBMIT",
                TestAction::Ping => "PING",
            }
        }
    }

    fn forms(state: &mut TestState, action: &TestAction) -> DispatchResult<&'static str> {
        state.trace.push("forms");
        match action {
            TestAction::Submit => {
                state.forms_submitted += 1;
                DispatchResult::changed().emit("FORM_DATA_UPDATED_f")
            }
            TestAction::Ping => DispatchResult::unchanged(),
        }
    }

    fn api(state: &mut TestState, action: &TestAction) -> DispatchResult<&'static str> {
        state.trace.push("api");
        match action {
            TestAction::Submit => {
                state.api_saw_submitted.push(state.forms_submitted);
                DispatchResult::effect("post")
            }
            TestAction::Ping => DispatchResult::unchanged(),
        }
    }

    fn route(state: &mut TestState, _action: &TestAction) -> DispatchResult<&'static str> {
        state.trace.push("route");
        DispatchResult::unchanged()
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let mut dispatcher = Dispatcher::new(TestState::default());
        dispatcher.register("forms", forms).unwrap();
        dispatcher.register("route", route).unwrap();

        dispatcher.dispatch(TestAction::Ping);

        assert_eq!(dispatcher.state().trace, vec!["forms", "route"]);
    }

    #[test]
    fn test_wait_for_observes_updated_state() {
        let mut dispatcher = Dispatcher::new(TestState::default());
        let api_token = dispatcher.register("api", api).unwrap();
        let forms_token = dispatcher.register("forms", forms).unwrap();
        dispatcher.wait_for(api_token, &[forms_token]).unwrap();

        let result = dispatcher.dispatch(TestAction::Submit);

        assert_eq!(dispatcher.handler_order(), vec!["forms", "api"]);
        assert_eq!(dispatcher.state().api_saw_submitted, vec![1]);
        assert!(result.changed);
        assert_eq!(result.events, vec!["FORM_DATA_UPDATED_f"]);
        assert_eq!(result.effects, vec!["post"]);
    }

    #[test]
    fn test_register_after() {
        let mut dispatcher = Dispatcher::new(TestState::default());
        let forms_token = dispatcher.register("forms", forms).unwrap();
        dispatcher.register("route", route).unwrap();
        dispatcher
            .register_after("api", api, &[forms_token])
            .unwrap();

        dispatcher.dispatch(TestAction::Submit);
        dispatcher.dispatch(TestAction::Submit);

        assert_eq!(dispatcher.state().api_saw_submitted, vec![1, 2]);
        assert_eq!(dispatcher.token("api"), Some(DispatchToken(2)));
    }

    #[test]
    fn test_duplicate_store_rejected() {
        let mut dispatcher = Dispatcher::new(TestState::default());
        dispatcher.register("forms", forms).unwrap();

        let err = dispatcher.register("forms", api).unwrap_err();
        assert_eq!(err, DispatchError::DuplicateStore("forms".into()));
        assert_eq!(dispatcher.len(), 1);
    }

    #[test]
    fn test_unknown_token_rejected() {
        let mut dispatcher = Dispatcher::new(TestState::default());
        let err = dispatcher
            .register_after("api", api, &[DispatchToken(7)])
            .unwrap_err();
        assert_eq!(err, DispatchError::UnknownToken(DispatchToken(7)));
        assert!(dispatcher.is_empty());
    }

    #[test]
    fn test_cycle_rejected_and_order_kept() {
        let mut dispatcher = Dispatcher::new(TestState::default());
        let forms_token = dispatcher.register("forms", forms).unwrap();
        let api_token = dispatcher.register_after("api", api, &[forms_token]).unwrap();

        let err = dispatcher.wait_for(forms_token, &[api_token]).unwrap_err();
        assert_eq!(
            err,
            DispatchError::CyclicDependency {
                store: "forms".into(),
                on: "api".into(),
            }
        );

        dispatcher.dispatch(TestAction::Submit);
        assert_eq!(dispatcher.handler_order(), vec!["forms", "api"]);
        assert_eq!(dispatcher.state().api_saw_submitted, vec![1]);
    }

    #[test]
    fn test_self_wait_is_a_cycle() {
        let mut dispatcher = Dispatcher::new(TestState::default());
        let forms_token = dispatcher.register("forms", forms).unwrap();
        assert!(matches!(
            dispatcher.wait_for(forms_token, &[forms_token]),
            Err(DispatchError::CyclicDependency { .. })
        ));
    }

    struct Recording(Arc<Mutex<Vec<String>>>);

    impl Middleware<TestAction> for Recording {
        fn before(&mut self, action: &TestAction) {
            self.0.lock().unwrap().push(format!("before {}", action.name()));
        }

        fn after(&mut self, action: &TestAction, state_changed: bool) {
            self.0
                .lock()
                .unwrap()
                .push(format!("after {} {}", action.name(), state_changed));
        }
    }

    #[test]
    fn test_middleware_wraps_dispatch() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = Dispatcher::new(TestState::default());
        dispatcher.register("forms", forms).unwrap();
        dispatcher.add_middleware(Recording(log.clone()));

        dispatcher.dispatch(TestAction::Submit);
        dispatcher.dispatch(TestAction::Ping);

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "before SUBMIT",
                "after SUBMIT true",
                "before PING",
                "after PING false"
            ]
        );
    }
}

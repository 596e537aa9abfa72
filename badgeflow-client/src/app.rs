//! Application wiring: store registration order and the effect-running loop

use std::sync::Arc;

use badgeflow::{DispatchError, Dispatcher, EventName, LoggingMiddleware, Runtime, Subscription};
use tokio_util::sync::CancellationToken;

use crate::action::AppAction;
use crate::config::ClientConfig;
use crate::creators::ActionCreators;
use crate::effect::{Effect, EffectRunner};
use crate::error::ClientError;
use crate::stores::{active_action, api, form, menu, route, user, Stores};
use crate::transport::{ReqwestTransport, Transport};

pub type AppDispatcher = Dispatcher<Stores, AppAction, Effect>;
pub type AppRuntime = Runtime<Stores, AppAction, Effect>;

/// Register every store handler.
///
/// The API store waits for the form store (a submit reads the form state the
/// form store just moved to `waiting`); the menu store waits for the user
/// store (role menu entries depend on the user).
pub fn dispatcher(stores: Stores) -> Result<AppDispatcher, DispatchError> {
    let mut dispatcher = Dispatcher::new(stores);

    let forms = dispatcher.register("forms", form::handle)?;
    dispatcher.register_after("api", api::handle, &[forms])?;
    dispatcher.register("active_action", active_action::handle)?;
    dispatcher.register("route", route::handle)?;
    let user = dispatcher.register("user", user::handle)?;
    dispatcher.register_after("menu", menu::handle, &[user])?;

    dispatcher.add_middleware(LoggingMiddleware::new());
    Ok(dispatcher)
}

/// Stores, runtime and effect runner bundled together.
pub struct App {
    runtime: AppRuntime,
    effects: EffectRunner,
}

impl App {
    /// Application talking to the server described by `config`.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let transport = ReqwestTransport::new(config)?;
        Self::with_transport(Arc::new(transport), Stores::default())
    }

    pub fn with_transport(
        transport: Arc<dyn Transport>,
        stores: Stores,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            runtime: Runtime::new(dispatcher(stores)?),
            effects: EffectRunner::new(transport),
        })
    }

    pub fn actions(&self) -> ActionCreators {
        ActionCreators::new(self.runtime.sender())
    }

    pub fn stores(&self) -> &Stores {
        self.runtime.state()
    }

    pub fn subscribe(&mut self, event: impl Into<EventName>) -> Subscription {
        self.runtime.subscribe(event)
    }

    pub fn subscribe_all(&mut self) -> Subscription {
        self.runtime.bus_mut().subscribe_all()
    }

    pub fn runtime(&self) -> &AppRuntime {
        &self.runtime
    }

    /// Process queued actions and running requests until nothing is left.
    pub async fn run_until_idle(&mut self) {
        let effects = &self.effects;
        self.runtime
            .run_until_idle(|effect, tasks| effects.handle(effect, tasks))
            .await;
    }

    /// Process actions until `cancel` fires.
    pub async fn run(&mut self, cancel: CancellationToken) {
        let effects = &self.effects;
        self.runtime
            .run(|effect, tasks| effects.handle(effect, tasks), cancel)
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_order() {
        let dispatcher = dispatcher(Stores::default()).unwrap();
        let order = dispatcher.handler_order();

        let position = |name: &str| order.iter().position(|n| *n == name).unwrap();
        assert!(position("forms") < position("api"));
        assert!(position("user") < position("menu"));
        assert_eq!(order.len(), 6);
    }
}

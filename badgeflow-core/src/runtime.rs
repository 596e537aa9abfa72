//! Action loop tying the dispatcher, event bus and task manager together
//!
//! Actions arrive on a single channel (from action creators and from finished
//! tasks), are dispatched one at a time, their events are emitted to the bus
//! and their effects are handed to an effect handler that may spawn tasks.
//! Work produced while an action is being dispatched is always queued behind
//! it, so dispatches never nest.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::bus::{EventBus, Subscription};
use crate::dispatcher::Dispatcher;
use crate::effect::DispatchResult;
use crate::event::EventName;
use crate::tasks::TaskManager;
use crate::Action;

/// How long `run_until_idle` waits on the channel before re-checking tasks.
const IDLE_POLL: Duration = Duration::from_millis(10);

/// Owns the dispatcher and drives the action loop.
pub struct Runtime<S, A: Action, E> {
    dispatcher: Dispatcher<S, A, E>,
    bus: EventBus,
    tasks: TaskManager<A>,
    action_tx: mpsc::UnboundedSender<A>,
    action_rx: mpsc::UnboundedReceiver<A>,
}

impl<S, A: Action, E> Runtime<S, A, E> {
    pub fn new(dispatcher: Dispatcher<S, A, E>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            dispatcher,
            bus: EventBus::new(),
            tasks: TaskManager::new(action_tx.clone()),
            action_tx,
            action_rx,
        }
    }

    /// Sender for queueing actions.
    pub fn sender(&self) -> mpsc::UnboundedSender<A> {
        self.action_tx.clone()
    }

    /// Queue an action for the next cycle.
    pub fn enqueue(&self, action: A) {
        // The receiver lives in `self`, so the send cannot fail
        let _ = self.action_tx.send(action);
    }

    pub fn subscribe(&mut self, event: impl Into<EventName>) -> Subscription {
        self.bus.subscribe(event)
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub fn state(&self) -> &S {
        self.dispatcher.state()
    }

    pub fn dispatcher(&self) -> &Dispatcher<S, A, E> {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher<S, A, E> {
        &mut self.dispatcher
    }

    pub fn tasks(&self) -> &TaskManager<A> {
        &self.tasks
    }

    /// Dispatch one action now, emit its events and run its effects.
    pub fn process<H>(&mut self, action: A, handler: &mut H) -> bool
    where
        H: FnMut(E, &mut TaskManager<A>),
    {
        let DispatchResult {
            changed,
            events,
            effects,
        } = self.dispatcher.dispatch(action);

        for event in &events {
            self.bus.emit(event);
        }
        for effect in effects {
            handler(effect, &mut self.tasks);
        }
        changed
    }

    /// Process every queued action without waiting. Returns how many ran.
    pub fn drain<H>(&mut self, handler: &mut H) -> usize
    where
        H: FnMut(E, &mut TaskManager<A>),
    {
        let mut processed = 0;
        while let Ok(action) = self.action_rx.try_recv() {
            self.process(action, handler);
            processed += 1;
        }
        processed
    }

    /// Run until the queue is empty and no task is still in flight.
    pub async fn run_until_idle<H>(&mut self, mut handler: H)
    where
        H: FnMut(E, &mut TaskManager<A>),
    {
        loop {
            // Read before draining: a task that finished earlier already queued its action
            let pending = self.tasks.in_flight();
            if self.drain(&mut handler) > 0 {
                continue;
            }
            if pending == 0 {
                break;
            }
            if let Ok(Some(action)) = tokio::time::timeout(IDLE_POLL, self.action_rx.recv()).await {
                self.process(action, &mut handler);
            }
        }
        debug!("Runtime idle");
    }

    /// Run until `cancel` fires.
    pub async fn run<H>(&mut self, mut handler: H, cancel: CancellationToken)
    where
        H: FnMut(E, &mut TaskManager<A>),
    {
        loop {
            let action = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Runtime cancelled");
                    break;
                }
                Some(action) = self.action_rx.recv() => action,
            };
            self.process(action, &mut handler);
        }
    }
}

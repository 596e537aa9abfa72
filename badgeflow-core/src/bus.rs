//! Event bus delivering store events to subscribed views

use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::debug;

use crate::event::EventName;

/// Receiving end of a subscription. Dropping it unsubscribes.
pub type Subscription = mpsc::UnboundedReceiver<EventName>;

/// Routes emitted event names to their subscribers
///
/// Views subscribe by name and get a channel receiver. A view that goes away
/// simply drops its receiver; the closed sender is pruned on the next emit, so
/// late store events arriving after a view unmounted are harmless.
#[derive(Debug, Default)]
pub struct EventBus {
    /// Subscriptions: event name -> senders
    subscriptions: HashMap<EventName, Vec<mpsc::UnboundedSender<EventName>>>,
    /// Subscribers to every event
    wildcard: Vec<mpsc::UnboundedSender<EventName>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a single event name
    pub fn subscribe(&mut self, event: impl Into<EventName>) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscriptions.entry(event.into()).or_default().push(tx);
        rx
    }

    /// Subscribe one receiver to several event names
    pub fn subscribe_many<I, N>(&mut self, events: I) -> Subscription
    where
        I: IntoIterator<Item = N>,
        N: Into<EventName>,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        for event in events {
            self.subscriptions
                .entry(event.into())
                .or_default()
                .push(tx.clone());
        }
        rx
    }

    /// Subscribe to every event
    pub fn subscribe_all(&mut self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        self.wildcard.push(tx);
        rx
    }

    /// Deliver an event; returns how many subscribers received it
    pub fn emit(&mut self, event: &EventName) -> usize {
        let mut delivered = 0;

        if let Some(senders) = self.subscriptions.get_mut(event) {
            senders.retain(|tx| tx.send(event.clone()).is_ok());
            delivered += senders.len();
            if senders.is_empty() {
                self.subscriptions.remove(event);
            }
        }

        self.wildcard.retain(|tx| tx.send(event.clone()).is_ok());
        delivered += self.wildcard.len();

        debug!(event = %event, delivered, "Event emitted");
        delivered
    }

    /// Number of live subscribers for an event name (wildcards excluded)
    pub fn subscriber_count(&self, event: &EventName) -> usize {
        self.subscriptions
            .get(event)
            .map(|senders| senders.iter().filter(|tx| !tx.is_closed()).count())
            .unwrap_or(0)
    }
}

/// Drain every event currently queued on a subscription
pub fn drain_events(subscription: &mut Subscription) -> Vec<EventName> {
    let mut events = Vec::new();
    while let Ok(event) = subscription.try_recv() {
        events.push(event);
    }
    events
}

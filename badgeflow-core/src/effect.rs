//! Handler results: change flag, emitted events and declared effects
//!
//! A store handler never performs I/O. It mutates its store and returns a
//! [`DispatchResult`] naming the events views should hear about and the
//! effects (HTTP requests, ...) the runtime should execute.
//!
//! ```ignore
//! fn handle(stores: &mut Stores, action: &AppAction) -> DispatchResult<Effect> {
//!     match action {
//!         AppAction::ApiFetchCollections { keys } => {
//!             let effects = stores.api.fetch_collections(keys);
//!             DispatchResult::effects(effects)
//!         }
//!         AppAction::RouteChanged { href } => {
//!             stores.route.change(href.clone());
//!             DispatchResult::changed().emit("ROUTE_CHANGED")
//!         }
//!         _ => DispatchResult::unchanged(),
//!     }
//! }
//! ```

use crate::event::EventName;

/// Result of running one or more handlers for an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult<E> {
    /// Whether any store state was modified.
    pub changed: bool,
    /// Events to emit to subscribers, in order.
    pub events: Vec<EventName>,
    /// Effects to be processed after dispatch.
    pub effects: Vec<E>,
}

impl<E> Default for DispatchResult<E> {
    fn default() -> Self {
        Self::unchanged()
    }
}

impl<E> DispatchResult<E> {
    /// No state change, no events, no effects.
    #[inline]
    pub fn unchanged() -> Self {
        Self {
            changed: false,
            events: Vec::new(),
            effects: Vec::new(),
        }
    }

    /// State changed, nothing else.
    #[inline]
    pub fn changed() -> Self {
        Self {
            changed: true,
            ..Self::unchanged()
        }
    }

    /// A single effect without a state change.
    #[inline]
    pub fn effect(effect: E) -> Self {
        Self {
            effects: vec![effect],
            ..Self::unchanged()
        }
    }

    /// Several effects without a state change.
    #[inline]
    pub fn effects(effects: Vec<E>) -> Self {
        Self {
            effects,
            ..Self::unchanged()
        }
    }

    /// Add an event to emit.
    #[inline]
    pub fn emit(mut self, event: impl Into<EventName>) -> Self {
        self.events.push(event.into());
        self
    }

    /// Add an effect.
    #[inline]
    pub fn with(mut self, effect: E) -> Self {
        self.effects.push(effect);
        self
    }

    /// Set the changed flag.
    #[inline]
    pub fn mark_changed(mut self) -> Self {
        self.changed = true;
        self
    }

    #[inline]
    pub fn has_effects(&self) -> bool {
        !self.effects.is_empty()
    }

    #[inline]
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Append another result, keeping event and effect order.
    pub fn merge(&mut self, other: DispatchResult<E>) {
        self.changed |= other.changed;
        self.events.extend(other.events);
        self.effects.extend(other.effects);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum TestEffect {
        Fetch(&'static str),
        Save,
    }

    #[test]
    fn test_builders() {
        let r: DispatchResult<TestEffect> = DispatchResult::unchanged();
        assert!(!r.changed);
        assert!(!r.has_events());
        assert!(!r.has_effects());

        let r: DispatchResult<TestEffect> = DispatchResult::changed();
        assert!(r.changed);

        let r = DispatchResult::effect(TestEffect::Save);
        assert!(!r.changed);
        assert_eq!(r.effects, vec![TestEffect::Save]);
    }

    #[test]
    fn test_chaining() {
        let r = DispatchResult::unchanged()
            .with(TestEffect::Fetch("/v1/earner/badges"))
            .emit("DATA_UPDATED")
            .mark_changed();
        assert!(r.changed);
        assert_eq!(r.events, vec![EventName::from("DATA_UPDATED")]);
        assert_eq!(r.effects.len(), 1);
    }

    #[test]
    fn test_merge_keeps_order() {
        let mut first = DispatchResult::changed()
            .emit("FORM_DATA_UPDATED_f")
            .with(TestEffect::Save);
        let second = DispatchResult::unchanged()
            .emit("DATA_UPDATED")
            .with(TestEffect::Fetch("/x"));

        first.merge(second);

        assert!(first.changed);
        assert_eq!(
            first.events,
            vec![
                EventName::from("FORM_DATA_UPDATED_f"),
                EventName::from("DATA_UPDATED")
            ]
        );
        assert_eq!(first.effects, vec![TestEffect::Save, TestEffect::Fetch("/x")]);
    }
}

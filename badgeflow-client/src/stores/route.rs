//! Current and previous location

use badgeflow::DispatchResult;

use super::Stores;
use crate::action::AppAction;
use crate::effect::Effect;
use crate::events::ROUTE_CHANGED;

#[derive(Debug, Default)]
pub struct RouteStore {
    current: Option<String>,
    previous: Option<String>,
}

impl RouteStore {
    pub fn get_route(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn previous_route(&self) -> Option<&str> {
        self.previous.as_deref()
    }
}

pub fn handle(stores: &mut Stores, action: &AppAction) -> DispatchResult<Effect> {
    match action {
        AppAction::RouteChanged { href } => {
            let route = &mut stores.route;
            route.previous = route.current.replace(href.clone());
            DispatchResult::changed().emit(ROUTE_CHANGED)
        }
        _ => DispatchResult::unchanged(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_changes_keep_previous() {
        let mut stores = Stores::default();
        for href in ["/earner", "/issuer/acme"] {
            let result = handle(&mut stores, &AppAction::RouteChanged { href: href.into() });
            assert_eq!(result.events, vec![ROUTE_CHANGED]);
        }

        assert_eq!(stores.route.get_route(), Some("/issuer/acme"));
        assert_eq!(stores.route.previous_route(), Some("/earner"));
    }
}

//! Signed-in user, seeded from the bootstrap document

use badgeflow::DispatchResult;
use serde::{Deserialize, Serialize};

use super::Stores;
use crate::action::AppAction;
use crate::effect::Effect;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub is_staff: bool,
}

impl UserProfile {
    /// Full name, or the username when no name is set.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

#[derive(Debug, Default)]
pub struct UserStore {
    user: Option<UserProfile>,
}

impl UserStore {
    pub fn get_user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_staff(&self) -> bool {
        self.user.as_ref().is_some_and(|user| user.is_staff)
    }
}

pub fn handle(stores: &mut Stores, action: &AppAction) -> DispatchResult<Effect> {
    match action {
        AppAction::AppWillMount { bootstrap } => {
            stores.user.user = bootstrap.user.clone();
            DispatchResult::changed()
        }
        _ => DispatchResult::unchanged(),
    }
}

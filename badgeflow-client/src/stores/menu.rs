//! Navigation menus and the open dialog

use std::collections::BTreeMap;

use badgeflow::DispatchResult;
use serde::{Deserialize, Serialize};

use super::Stores;
use crate::action::AppAction;
use crate::effect::Effect;
use crate::events::{CLOSE_MODAL, OPEN_DIALOG, UNCAUGHT_DOCUMENT_CLICK};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    pub fn new(title: &str, url: &str, icon: &str) -> Self {
        Self {
            title: title.to_string(),
            url: url.to_string(),
            icon: Some(icon.to_string()),
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Menus {
    pub top_menu: Vec<MenuItem>,
    pub role_menu: Vec<MenuItem>,
    /// Per-section menus, keyed by section (`earner`, `issuer`, ...)
    pub secondary_menus: BTreeMap<String, Vec<MenuItem>>,
}

impl Menus {
    pub fn builtin() -> Self {
        Self {
            top_menu: vec![
                MenuItem::new("Earn", "/earner", "fa-certificate"),
                MenuItem::new("Issue", "/issuer", "fa-send"),
                MenuItem::new("Explore", "/explorer", "fa-globe"),
            ],
            role_menu: Vec::new(),
            secondary_menus: BTreeMap::from([
                (
                    "earner".to_string(),
                    vec![
                        MenuItem::new("My Badges", "/earner/badges", "fa-certificate"),
                        MenuItem::new("My Collections", "/earner/collections", "fa-folder-open"),
                    ],
                ),
                (
                    "issuer".to_string(),
                    vec![MenuItem::new("Issuers", "/issuer/issuers", "fa-institution")],
                ),
            ]),
        }
    }
}

#[derive(Debug)]
pub struct MenuStore {
    menus: Menus,
    initialized: bool,
    open_dialog: Option<String>,
}

impl Default for MenuStore {
    fn default() -> Self {
        Self {
            menus: Menus::builtin(),
            initialized: false,
            open_dialog: None,
        }
    }
}

impl MenuStore {
    pub fn get_all_items(&self) -> &Menus {
        &self.menus
    }

    pub fn top_menu(&self) -> &[MenuItem] {
        &self.menus.top_menu
    }

    pub fn role_menu(&self) -> &[MenuItem] {
        &self.menus.role_menu
    }

    pub fn secondary_menu(&self, section: &str) -> &[MenuItem] {
        self.menus
            .secondary_menus
            .get(section)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn open_dialog(&self) -> Option<&str> {
        self.open_dialog.as_deref()
    }
}

pub fn handle(stores: &mut Stores, action: &AppAction) -> DispatchResult<Effect> {
    match action {
        AppAction::AppWillMount { bootstrap } => {
            if stores.menu.initialized {
                return DispatchResult::unchanged();
            }
            if let Some(menus) = &bootstrap.menus {
                stores.menu.menus = menus.clone();
            }
            stores.menu.menus.role_menu.extend(bootstrap.role_menu.iter().cloned());
            // UserStore ran first
            if stores.user.is_staff() {
                stores
                    .menu
                    .menus
                    .role_menu
                    .push(MenuItem::new("Admin", "/staff", "fa-cog"));
            }
            stores.menu.initialized = true;
            DispatchResult::changed()
        }
        AppAction::ClickCloseMenu => DispatchResult::unchanged().emit(UNCAUGHT_DOCUMENT_CLICK),
        AppAction::OpenDialog { dialog_id } => {
            stores.menu.open_dialog = Some(dialog_id.clone());
            DispatchResult::changed().emit(OPEN_DIALOG)
        }
        AppAction::CloseModal => {
            stores.menu.open_dialog = None;
            DispatchResult::changed().emit(CLOSE_MODAL)
        }
        _ => DispatchResult::unchanged(),
    }
}

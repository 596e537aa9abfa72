//! Bootstrap document delivered with the initial page

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::model::Item;
use crate::stores::menu::{MenuItem, Menus};
use crate::stores::user::UserProfile;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Bootstrap {
    /// Collection key to items, loaded into the API store at mount.
    pub initial_data: BTreeMap<String, Vec<Item>>,
    pub user: Option<UserProfile>,
    /// Extra entries appended to the role menu.
    pub role_menu: Vec<MenuItem>,
    /// Replaces the built-in menus when present.
    pub menus: Option<Menus>,
}

impl Bootstrap {
    pub fn from_json(json: &str) -> Result<Self, ClientError> {
        Ok(serde_json::from_str(json)?)
    }
}

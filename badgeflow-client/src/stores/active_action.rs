//! Contextual panel shown in each view region

use std::collections::HashMap;

use badgeflow::DispatchResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::form_config::FormType;
use super::Stores;
use crate::action::AppAction;
use crate::effect::Effect;
use crate::events::ACTIVE_ACTION_UPDATED;

/// What a view region currently shows, serialized as `{ "type", "content" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "camelCase")]
pub enum ActivePanel {
    DetailView { item: Value },
    CreateForm { form_type: FormType },
    EditForm { form_type: FormType, item: Value },
}

#[derive(Debug, Default)]
pub struct ActiveActionStore {
    panels: HashMap<String, ActivePanel>,
}

impl ActiveActionStore {
    pub fn get_active_action(&self, view_id: &str) -> Option<&ActivePanel> {
        self.panels.get(view_id)
    }
}

pub fn handle(stores: &mut Stores, action: &AppAction) -> DispatchResult<Effect> {
    match action {
        AppAction::ActiveActionUpdated { view_id, panel } => {
            stores.active_action.panels.insert(view_id.clone(), panel.clone());
            DispatchResult::changed().emit(ACTIVE_ACTION_UPDATED)
        }
        AppAction::ActiveActionCleared { view_id } => {
            stores.active_action.panels.remove(view_id);
            DispatchResult::changed().emit(ACTIVE_ACTION_UPDATED)
        }
        _ => DispatchResult::unchanged(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_panel_serializes_as_tagged_union() {
        let panel = ActivePanel::EditForm {
            form_type: FormType::EarnerCollectionEdit,
            item: json!({ "slug": "a" }),
        };
        assert_eq!(
            serde_json::to_value(&panel).unwrap(),
            json!({
                "type": "editForm",
                "content": { "form_type": "earner_collection_edit", "item": { "slug": "a" } }
            })
        );
    }

    #[test]
    fn test_update_and_clear() {
        let mut stores = Stores::default();
        let panel = ActivePanel::CreateForm {
            form_type: FormType::IssuerCreate,
        };

        handle(
            &mut stores,
            &AppAction::ActiveActionUpdated {
                view_id: "issuer".into(),
                panel: panel.clone(),
            },
        );
        assert_eq!(stores.active_action.get_active_action("issuer"), Some(&panel));
        assert!(stores.active_action.get_active_action("earner").is_none());

        let result = handle(
            &mut stores,
            &AppAction::ActiveActionCleared {
                view_id: "issuer".into(),
            },
        );
        assert!(result.changed);
        assert_eq!(result.events, vec![ACTIVE_ACTION_UPDATED]);
        assert!(stores.active_action.get_active_action("issuer").is_none());
    }
}

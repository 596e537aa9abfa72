//! Per-form transient state
//!
//! Each form id owns a record created on first access from its form type's
//! configuration. The lifecycle is `ready -> waiting -> complete`, or back to
//! `ready` with a danger message when the submission fails. `FORM_RESET`
//! returns to `ready` with a fresh copy of the defaults from any state.

use std::collections::HashMap;

use badgeflow::DispatchResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::form_config::{FieldSpec, FormConfig, FormType};
use super::Stores;
use crate::action::AppAction;
use crate::effect::Effect;
use crate::events::form_data_updated;
use crate::model::{FieldValue, FormId, FormValues, Message};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionState {
    #[default]
    Ready,
    Waiting,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormState {
    pub values: FormValues,
    pub action_state: ActionState,
    pub message: Option<Message>,
    /// Object returned by a successful submission.
    pub result: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormRecord {
    pub fields_meta: Vec<FieldSpec>,
    pub form_state: FormState,
    pub default_values: FormValues,
}

impl FormRecord {
    fn new(config: &FormConfig) -> Self {
        Self {
            fields_meta: config.fields.clone(),
            form_state: FormState {
                values: config.defaults.clone(),
                ..FormState::default()
            },
            default_values: config.defaults.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct FormStore {
    forms: HashMap<FormId, FormRecord>,
    /// Form whose submit was accepted by the current dispatch.
    accepted_submit: Option<FormId>,
}

impl FormStore {
    pub fn get_form(&self, form_id: &str) -> Option<&FormRecord> {
        self.forms.get(form_id)
    }

    pub fn get_form_state(&self, form_id: &str) -> Option<&FormState> {
        self.forms.get(form_id).map(|record| &record.form_state)
    }

    pub fn get_field_value(&self, form_id: &str, field: &str) -> Option<&FieldValue> {
        self.get_form_state(form_id)?.values.get(field)
    }

    pub fn get_or_init_form_data(&mut self, form_id: &str, config: &FormConfig) -> &mut FormRecord {
        self.forms
            .entry(form_id.to_string())
            .or_insert_with(|| FormRecord::new(config))
    }

    /// Back to `ready` with a fresh copy of the defaults. `false` for unknown forms.
    pub fn reset_form(&mut self, form_id: &str) -> bool {
        let Some(record) = self.forms.get_mut(form_id) else {
            return false;
        };
        record.form_state = FormState {
            values: record.default_values.clone(),
            ..FormState::default()
        };
        true
    }

    /// Shallow-merge `partial` into the form's values. `false` for unknown forms.
    pub fn patch_form(&mut self, form_id: &str, partial: &FormValues) -> bool {
        let Some(record) = self.forms.get_mut(form_id) else {
            return false;
        };
        record
            .form_state
            .values
            .extend(partial.iter().map(|(k, v)| (k.clone(), v.clone())));
        true
    }

    /// Set when this dispatch moved `form_id` from `ready` to `waiting`.
    pub fn accepted_submit(&self) -> Option<&str> {
        self.accepted_submit.as_deref()
    }
}

fn updated(form_id: &str) -> DispatchResult<Effect> {
    DispatchResult::changed().emit(form_data_updated(form_id))
}

fn unknown_form(form_type: FormType) -> DispatchResult<Effect> {
    warn!(?form_type, "No form configuration registered");
    DispatchResult::unchanged()
}

pub fn handle(stores: &mut Stores, action: &AppAction) -> DispatchResult<Effect> {
    stores.forms.accepted_submit = None;

    match action {
        AppAction::FormDataPatched { form_id, form_type, update } => {
            let Some(config) = stores.form_config.config(*form_type) else {
                return unknown_form(*form_type);
            };
            let state = stores.forms.get_or_init_form_data(form_id, config).form_state.action_state;
            if state != ActionState::Ready {
                debug!(form_id = %form_id, ?state, "Ignoring patch outside ready");
                return DispatchResult::unchanged();
            }
            stores.forms.patch_form(form_id, update);
            updated(form_id)
        }

        AppAction::FormSubmit { form_id, form_type, params } => {
            let Some(config) = stores.form_config.config(*form_type) else {
                return unknown_form(*form_type);
            };
            let context = stores.form_config.request_context(*form_type, params, form_id);
            let record = stores.forms.get_or_init_form_data(form_id, config);
            if record.form_state.action_state != ActionState::Ready {
                debug!(form_id = %form_id, "Ignoring submit outside ready");
                return DispatchResult::unchanged();
            }
            if let Err(e) = context {
                warn!(form_id = %form_id, error = %e, "Cannot submit form");
                record.form_state.message = Some(Message::danger(e.to_string()));
                return updated(form_id);
            }
            record.form_state.action_state = ActionState::Waiting;
            record.form_state.message = None;
            stores.forms.accepted_submit = Some(form_id.clone());
            updated(form_id)
        }

        AppAction::FormReset { form_id, form_type } => {
            let Some(config) = stores.form_config.config(*form_type) else {
                return unknown_form(*form_type);
            };
            stores.forms.get_or_init_form_data(form_id, config);
            stores.forms.reset_form(form_id);
            updated(form_id)
        }

        AppAction::ApiFormResultSuccess { form_id, result, message, .. } => {
            match stores.forms.forms.get_mut(form_id) {
                Some(record) if record.form_state.action_state == ActionState::Waiting => {
                    record.form_state.action_state = ActionState::Complete;
                    record.form_state.message = Some(message.clone());
                    record.form_state.result = Some(result.clone());
                    updated(form_id)
                }
                _ => DispatchResult::unchanged(),
            }
        }

        AppAction::ApiFormResultFailure { form_id, message } => {
            match stores.forms.forms.get_mut(form_id) {
                Some(record) if record.form_state.action_state == ActionState::Waiting => {
                    record.form_state.action_state = ActionState::Ready;
                    record.form_state.message = Some(message.clone());
                    updated(form_id)
                }
                _ => DispatchResult::unchanged(),
            }
        }

        AppAction::ApiSubmitDataDidFail { context, failure } => {
            let Some(form_id) = &context.form_id else {
                return DispatchResult::unchanged();
            };
            let Some(record) = stores.forms.forms.get_mut(form_id) else {
                return DispatchResult::unchanged();
            };
            if record.form_state.action_state == ActionState::Waiting {
                record.form_state.action_state = ActionState::Ready;
            }
            record.form_state.message = Some(failure.message("submitting data"));
            updated(form_id)
        }

        _ => DispatchResult::unchanged(),
    }
}

//! Application actions

use badgeflow::ActionSummary;
use serde_json::Value;

use crate::bootstrap::Bootstrap;
use crate::context::RequestContext;
use crate::model::{FormId, FormValues, Message, UrlParams};
use crate::stores::active_action::ActivePanel;
use crate::stores::form_config::FormType;

/// Why a request did not produce a usable response.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiFailure {
    /// No response at all, or an unreadable one.
    Transport(String),
    /// A status outside the context's successful statuses.
    Status { status: u16, body: String },
}

impl ApiFailure {
    /// Danger message for the failure, e.g. `"500 Error getting data: ..."`.
    pub fn message(&self, doing: &str) -> Message {
        match self {
            ApiFailure::Transport(reason) => {
                Message::danger(format!("Error {}: {}", doing, reason))
            }
            ApiFailure::Status { status, body } => Message::http_error(*status, doing, body),
        }
    }
}

#[derive(badgeflow::Action, Clone, Debug, PartialEq)]
#[action(infer_categories)]
pub enum AppAction {
    // ===== Forms =====
    #[action(category = "form")]
    FormDataPatched {
        form_id: FormId,
        form_type: FormType,
        update: FormValues,
    },
    FormSubmit {
        form_id: FormId,
        form_type: FormType,
        params: UrlParams,
    },
    FormReset {
        form_id: FormId,
        form_type: FormType,
    },

    // ===== API intents =====
    ApiSubmitData {
        data: Option<Value>,
        context: RequestContext,
    },
    ApiGetData {
        context: RequestContext,
    },
    ApiFetchCollections {
        keys: Vec<String>,
    },

    // ===== API results =====
    ApiFormResultSuccess {
        form_id: FormId,
        context: RequestContext,
        result: Value,
        message: Message,
    },
    ApiFormResultFailure {
        form_id: FormId,
        message: Message,
    },
    ApiGetDataDidLoad {
        context: RequestContext,
        body: Value,
    },
    ApiGetDataDidFail {
        context: RequestContext,
        failure: ApiFailure,
    },
    ApiSubmitDataDidSucceed {
        context: RequestContext,
        body: Value,
    },
    ApiSubmitDataDidFail {
        context: RequestContext,
        failure: ApiFailure,
    },

    // ===== UI =====
    ActiveActionUpdated {
        view_id: String,
        panel: ActivePanel,
    },
    ActiveActionCleared {
        view_id: String,
    },
    RouteChanged {
        href: String,
    },
    AppWillMount {
        bootstrap: Box<Bootstrap>,
    },
    ClickCloseMenu,
    CloseModal,
    OpenDialog {
        dialog_id: String,
    },
}

impl ActionSummary for AppAction {
    fn summary(&self) -> String {
        match self {
            AppAction::FormDataPatched { form_id, update, .. } => {
                format!("FormDataPatched {{ form_id: {:?}, fields: {} }}", form_id, update.len())
            }
            AppAction::ApiGetData { context } => {
                format!("ApiGetData {{ url: {:?} }}", context.action_url)
            }
            AppAction::ApiGetDataDidLoad { context, body } => format!(
                "ApiGetDataDidLoad {{ collection: {:?}, items: {} }}",
                context.api_collection_key,
                body.as_array().map_or(1, Vec::len)
            ),
            AppAction::ApiFormResultSuccess { form_id, .. } => {
                format!("ApiFormResultSuccess {{ form_id: {:?} }}", form_id)
            }
            AppAction::ApiSubmitDataDidSucceed { context, .. } => format!(
                "ApiSubmitDataDidSucceed {{ collection: {:?} }}",
                context.api_collection_key
            ),
            // Bootstrap documents are large
            AppAction::AppWillMount { bootstrap } => format!(
                "AppWillMount {{ collections: {} }}",
                bootstrap.initial_data.len()
            ),
            _ => format!("{:?}", self),
        }
    }
}

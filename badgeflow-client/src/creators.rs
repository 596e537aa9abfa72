//! Action creators: shape caller input into actions and queue them

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::action::AppAction;
use crate::bootstrap::Bootstrap;
use crate::context::RequestContext;
use crate::model::{FormValues, UrlParams};
use crate::stores::active_action::ActivePanel;
use crate::stores::form_config::FormType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HrefKind {
    /// Handled by the client-side router.
    Local,
    /// Left to the browser: `scheme:` links, `//host` links and `#` anchors.
    External,
}

pub fn classify_href(href: &str) -> HrefKind {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || href.starts_with("//") {
        return HrefKind::External;
    }
    let scheme_end = href.find(':');
    let path_start = href.find(['/', '?', '#']);
    match scheme_end {
        Some(end) if path_start.map_or(true, |start| end < start) => {
            let scheme = &href[..end];
            let valid = scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
            if valid {
                HrefKind::External
            } else {
                HrefKind::Local
            }
        }
        _ => HrefKind::Local,
    }
}

/// Queues actions on the runtime channel.
#[derive(Debug, Clone)]
pub struct ActionCreators {
    tx: mpsc::UnboundedSender<AppAction>,
}

impl ActionCreators {
    pub fn new(tx: mpsc::UnboundedSender<AppAction>) -> Self {
        Self { tx }
    }

    fn send(&self, action: AppAction) {
        if self.tx.send(action).is_err() {
            warn!("Runtime stopped, dropping action");
        }
    }

    pub fn patch_form(&self, form_id: impl Into<String>, form_type: FormType, update: FormValues) {
        self.send(AppAction::FormDataPatched {
            form_id: form_id.into(),
            form_type,
            update,
        });
    }

    pub fn submit_form(&self, form_id: impl Into<String>, form_type: FormType, params: UrlParams) {
        self.send(AppAction::FormSubmit {
            form_id: form_id.into(),
            form_type,
            params,
        });
    }

    pub fn reset_form(&self, form_id: impl Into<String>, form_type: FormType) {
        self.send(AppAction::FormReset {
            form_id: form_id.into(),
            form_type,
        });
    }

    pub fn submit_data(&self, data: Option<Value>, context: RequestContext) {
        self.send(AppAction::ApiSubmitData { data, context });
    }

    pub fn get_data(&self, context: RequestContext) {
        self.send(AppAction::ApiGetData { context });
    }

    pub fn fetch_collections<I, K>(&self, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.send(AppAction::ApiFetchCollections {
            keys: keys.into_iter().map(Into::into).collect(),
        });
    }

    pub fn update_active_action(&self, view_id: impl Into<String>, panel: ActivePanel) {
        self.send(AppAction::ActiveActionUpdated {
            view_id: view_id.into(),
            panel,
        });
    }

    pub fn clear_active_action(&self, view_id: impl Into<String>) {
        self.send(AppAction::ActiveActionCleared {
            view_id: view_id.into(),
        });
    }

    /// Route a local href and return `true`; external hrefs queue nothing.
    pub fn navigate(&self, href: &str) -> bool {
        match classify_href(href) {
            HrefKind::Local => {
                self.send(AppAction::RouteChanged {
                    href: href.to_string(),
                });
                true
            }
            HrefKind::External => {
                debug!(href, "External href, not routing");
                false
            }
        }
    }

    pub fn app_will_mount(&self, bootstrap: Bootstrap) {
        self.send(AppAction::AppWillMount {
            bootstrap: Box::new(bootstrap),
        });
    }

    pub fn close_menu(&self) {
        self.send(AppAction::ClickCloseMenu);
    }

    pub fn open_dialog(&self, dialog_id: impl Into<String>) {
        self.send(AppAction::OpenDialog {
            dialog_id: dialog_id.into(),
        });
    }

    pub fn close_modal(&self) {
        self.send(AppAction::CloseModal);
    }
}

//! Error types for the client crate

use badgeflow::DispatchError;
use thiserror::Error;

use crate::stores::form_config::FormType;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base url `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("missing url parameter `{param}` for `{template}`")]
    MissingUrlParam { param: String, template: String },
    #[error("no form configuration registered for {0:?}")]
    UnknownForm(FormType),
    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

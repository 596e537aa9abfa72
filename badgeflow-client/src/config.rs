//! Client configuration

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Header carrying the CSRF token on every request.
pub const CSRF_HEADER: &str = "X-CSRFToken";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    /// Origin the `/v1/...` API paths are resolved against
    pub base_url: String,
    /// Cookie the CSRF token is read from
    pub csrf_cookie_name: String,
    /// Fixed token, used instead of the cookie when set
    pub csrf_token: Option<String>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            csrf_cookie_name: "csrftoken".into(),
            csrf_token: None,
            user_agent: concat!("badgeflow/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl ClientConfig {
    /// Parse a JSON configuration; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ClientError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }
}

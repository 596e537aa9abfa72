//! Request contexts describing how an API call is made and applied

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::FormId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which item a successful data request updates, and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialUpdate {
    pub search_key: String,
    pub search_value: Value,
    pub update_key: String,
    /// Value to store; the response body when absent.
    #[serde(default)]
    pub update_value: Option<Value>,
}

fn default_successful_status() -> Vec<u16> {
    vec![200]
}

/// Everything needed to issue a request and fold its response into a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    pub action_url: String,
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(default = "default_successful_status")]
    pub successful_http_status: Vec<u16>,
    pub api_collection_key: String,
    #[serde(default)]
    pub replace_collection: bool,
    #[serde(default)]
    pub form_id: Option<FormId>,
    #[serde(default)]
    pub partial_update: Option<PartialUpdate>,
}

impl RequestContext {
    /// GET `action_url` into `collection`, successful on 200.
    pub fn get(action_url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            action_url: action_url.into(),
            method: HttpMethod::Get,
            successful_http_status: default_successful_status(),
            api_collection_key: collection.into(),
            replace_collection: false,
            form_id: None,
            partial_update: None,
        }
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_successful_status(mut self, statuses: &[u16]) -> Self {
        self.successful_http_status = statuses.to_vec();
        self
    }

    pub fn replacing(mut self) -> Self {
        self.replace_collection = true;
        self
    }

    pub fn for_form(mut self, form_id: impl Into<FormId>) -> Self {
        self.form_id = Some(form_id.into());
        self
    }

    pub fn with_partial_update(mut self, update: PartialUpdate) -> Self {
        self.partial_update = Some(update);
        self
    }

    pub fn is_success(&self, status: u16) -> bool {
        self.successful_http_status.contains(&status)
    }
}

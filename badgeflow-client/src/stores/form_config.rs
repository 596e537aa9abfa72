//! Static registry of form schemas and their API bindings

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::context::{HttpMethod, RequestContext};
use crate::error::ClientError;
use crate::model::{FieldValue, FormValues, UrlParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormType {
    EarnerBadgeImport,
    EarnerCollectionCreate,
    EarnerCollectionEdit,
    IssuerCreate,
    BadgeClassCreate,
    BadgeInstanceCreate,
}

impl FormType {
    pub const ALL: [FormType; 6] = [
        FormType::EarnerBadgeImport,
        FormType::EarnerCollectionCreate,
        FormType::EarnerCollectionEdit,
        FormType::IssuerCreate,
        FormType::BadgeClassCreate,
        FormType::BadgeInstanceCreate,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    TextArea,
    Email,
    Url,
    Select,
    Checkbox,
    Hidden,
    Image,
    File,
}

impl FieldKind {
    /// Image and file inputs are sent as file parts.
    pub fn is_file(&self) -> bool {
        matches!(self, FieldKind::Image | FieldKind::File)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    /// Filename used for the uploaded part of a file field.
    #[serde(default)]
    pub filename: Option<String>,
}

impl FieldSpec {
    fn new(name: &str, kind: FieldKind, label: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            label: label.to_string(),
            required: false,
            filename: None,
        }
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn uploaded_as(mut self, filename: &str) -> Self {
        self.filename = Some(filename.to_string());
        self
    }
}

/// How a submitted form reaches the API. `action_url` may contain `:param`
/// placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiBinding {
    pub action_url: String,
    pub method: HttpMethod,
    pub successful_http_status: Vec<u16>,
    pub api_collection_key: String,
}

impl ApiBinding {
    fn new(method: HttpMethod, action_url: &str, statuses: &[u16], collection: &str) -> Self {
        Self {
            action_url: action_url.to_string(),
            method,
            successful_http_status: statuses.to_vec(),
            api_collection_key: collection.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormConfig {
    pub form_type: FormType,
    pub fields: Vec<FieldSpec>,
    pub defaults: FormValues,
    pub api: ApiBinding,
    pub success_message: String,
}

/// Replace every `:name` path segment of `template` with `params[name]`.
pub fn fill_url_template(template: &str, params: &UrlParams) -> Result<String, ClientError> {
    let segments = template
        .split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(param) => params
                .get(param)
                .cloned()
                .ok_or_else(|| ClientError::MissingUrlParam {
                    param: param.to_string(),
                    template: template.to_string(),
                }),
            None => Ok(segment.to_string()),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(segments.join("/"))
}

#[derive(Debug, Clone)]
pub struct FormConfigStore {
    configs: HashMap<FormType, FormConfig>,
}

impl Default for FormConfigStore {
    fn default() -> Self {
        let mut store = Self {
            configs: HashMap::new(),
        };
        for form_type in FormType::ALL {
            store.register(builtin(form_type));
        }
        store
    }
}

impl FormConfigStore {
    pub fn empty() -> Self {
        Self {
            configs: HashMap::new(),
        }
    }

    /// Add or replace the configuration for `config.form_type`.
    pub fn register(&mut self, config: FormConfig) {
        self.configs.insert(config.form_type, config);
    }

    pub fn config(&self, form_type: FormType) -> Option<&FormConfig> {
        self.configs.get(&form_type)
    }

    /// Request context for submitting `form_id`, with URL parameters filled in.
    pub fn request_context(
        &self,
        form_type: FormType,
        params: &UrlParams,
        form_id: &str,
    ) -> Result<RequestContext, ClientError> {
        let config = self
            .config(form_type)
            .ok_or(ClientError::UnknownForm(form_type))?;
        let api = &config.api;
        let context = RequestContext::get(
            fill_url_template(&api.action_url, params)?,
            api.api_collection_key.as_str(),
        )
        .with_method(api.method)
        .with_successful_status(&api.successful_http_status)
        .for_form(form_id);
        Ok(context)
    }
}

fn defaults(pairs: &[(&str, FieldValue)]) -> FormValues {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

fn builtin(form_type: FormType) -> FormConfig {
    use FieldKind::*;
    use HttpMethod::*;

    let (fields, defaults, api, success_message) = match form_type {
        FormType::EarnerBadgeImport => (
            vec![
                FieldSpec::new("image", Image, "Badge image")
                    .uploaded_as("earner_badge_upload.png"),
                FieldSpec::new("url", Url, "Assertion URL"),
                FieldSpec::new("assertion", TextArea, "Assertion JSON"),
            ],
            defaults(&[
                ("image", FieldValue::Null),
                ("url", FieldValue::from("")),
                ("assertion", FieldValue::from("")),
            ]),
            ApiBinding::new(Post, "/v1/earner/badges", &[200, 201], "earner_badges"),
            "Badge successfully imported.",
        ),
        FormType::EarnerCollectionCreate => (
            vec![
                FieldSpec::new("name", Text, "Name").required(),
                FieldSpec::new("description", TextArea, "Description"),
            ],
            defaults(&[("name", FieldValue::from("")), ("description", FieldValue::from(""))]),
            ApiBinding::new(Post, "/v1/earner/collections", &[200, 201], "earner_collections"),
            "New collection created.",
        ),
        FormType::EarnerCollectionEdit => (
            vec![
                FieldSpec::new("name", Text, "Name").required(),
                FieldSpec::new("description", TextArea, "Description"),
            ],
            defaults(&[("name", FieldValue::from("")), ("description", FieldValue::from(""))]),
            ApiBinding::new(
                Put,
                "/v1/earner/collections/:collection",
                &[200],
                "earner_collections",
            ),
            "Collection updated.",
        ),
        FormType::IssuerCreate => (
            vec![
                FieldSpec::new("name", Text, "Issuer name").required(),
                FieldSpec::new("description", TextArea, "Description").required(),
                FieldSpec::new("url", Url, "Website URL").required(),
                FieldSpec::new("email", Email, "Contact email").required(),
                FieldSpec::new("image", Image, "Logo").uploaded_as("issuer_logo.png"),
            ],
            defaults(&[
                ("name", FieldValue::from("")),
                ("description", FieldValue::from("")),
                ("url", FieldValue::from("")),
                ("email", FieldValue::from("")),
                ("image", FieldValue::Null),
            ]),
            ApiBinding::new(Post, "/v1/issuer/issuers", &[200, 201], "issuer_issuers"),
            "Issuer created.",
        ),
        FormType::BadgeClassCreate => (
            vec![
                FieldSpec::new("name", Text, "Badge name").required(),
                FieldSpec::new("description", TextArea, "Description").required(),
                FieldSpec::new("criteria", TextArea, "Criteria").required(),
                FieldSpec::new("image", Image, "Badge image")
                    .required()
                    .uploaded_as("badge_image.png"),
            ],
            defaults(&[
                ("name", FieldValue::from("")),
                ("description", FieldValue::from("")),
                ("criteria", FieldValue::from("")),
                ("image", FieldValue::Null),
            ]),
            ApiBinding::new(
                Post,
                "/v1/issuer/issuers/:issuer/badges",
                &[200, 201],
                "issuer_badgeclasses",
            ),
            "Badge class created.",
        ),
        FormType::BadgeInstanceCreate => (
            vec![
                FieldSpec::new("email", Email, "Recipient email").required(),
                FieldSpec::new("evidence", Url, "Evidence URL"),
                FieldSpec::new("create_notification", Checkbox, "Notify recipient"),
            ],
            defaults(&[
                ("email", FieldValue::from("")),
                ("evidence", FieldValue::from("")),
                ("create_notification", FieldValue::Bool(false)),
            ]),
            ApiBinding::new(
                Post,
                "/v1/issuer/issuers/:issuer/badges/:badge/assertions",
                &[200, 201],
                "issuer_badgeinstances",
            ),
            "Badge awarded.",
        ),
    };

    FormConfig {
        form_type,
        fields,
        defaults,
        api,
        success_message: success_message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> UrlParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_fill_url_template() {
        let url = fill_url_template(
            "/v1/issuer/issuers/:issuer/badges/:badge/assertions",
            &params(&[("issuer", "acme"), ("badge", "gold")]),
        )
        .unwrap();
        assert_eq!(url, "/v1/issuer/issuers/acme/badges/gold/assertions");
        assert_eq!(
            fill_url_template("/v1/earner/badges", &UrlParams::new()).unwrap(),
            "/v1/earner/badges"
        );
    }

    #[test]
    fn test_missing_param() {
        let err = fill_url_template("/v1/issuer/issuers/:issuer/badges", &UrlParams::new())
            .unwrap_err();
        assert!(matches!(err, ClientError::MissingUrlParam { ref param, .. } if param == "issuer"));
    }

    #[test]
    fn test_every_form_type_registered() {
        let store = FormConfigStore::default();
        for form_type in FormType::ALL {
            let config = store.config(form_type).unwrap();
            for field in &config.fields {
                assert!(
                    config.defaults.contains_key(&field.name),
                    "{:?} has no default for {}",
                    form_type,
                    field.name
                );
            }
        }
    }

    #[test]
    fn test_request_context() {
        let store = FormConfigStore::default();
        let context = store
            .request_context(
                FormType::EarnerCollectionEdit,
                &params(&[("collection", "my-favorites")]),
                "collection-edit",
            )
            .unwrap();

        assert_eq!(context.action_url, "/v1/earner/collections/my-favorites");
        assert_eq!(context.method, HttpMethod::Put);
        assert_eq!(context.api_collection_key, "earner_collections");
        assert_eq!(context.form_id.as_deref(), Some("collection-edit"));
        assert!(!context.replace_collection);
    }

    #[test]
    fn test_unknown_form() {
        let mut store = FormConfigStore::empty();
        assert!(matches!(
            store.request_context(FormType::IssuerCreate, &UrlParams::new(), "f"),
            Err(ClientError::UnknownForm(FormType::IssuerCreate))
        ));

        let issuer = FormConfigStore::default()
            .config(FormType::IssuerCreate)
            .cloned()
            .unwrap();
        store.register(issuer);
        assert!(store
            .request_context(FormType::IssuerCreate, &UrlParams::new(), "f")
            .is_ok());
    }
}

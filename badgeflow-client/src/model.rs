//! Shared value types: collection items, form values, user-facing messages

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A loosely-typed record in a server-backed collection.
pub type Item = Value;

/// Identifier of a form instance (several instances may share a form type).
pub type FormId = String;

/// Values substituted into `:param` placeholders of URL templates.
pub type UrlParams = BTreeMap<String, String>;

/// Current values of a form, keyed by field name.
pub type FormValues = BTreeMap<String, FieldValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Success,
    Info,
    Danger,
}

/// Inline message shown next to a form or collection view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub content: String,
}

impl Message {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Success,
            content: content.into(),
        }
    }

    pub fn danger(content: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Danger,
            content: content.into(),
        }
    }

    /// `"<status> Error <doing>: <body>"`
    pub fn http_error(status: u16, doing: &str, body: &str) -> Self {
        Self::danger(format!("{} Error {}: {}", status, doing, body))
    }
}

/// An uploaded file held in memory until the form is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileUpload {
    pub filename: String,
    #[serde(default)]
    pub bytes: Vec<u8>,
}

/// Value of one form field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    File(FileUpload),
}

impl FieldValue {
    /// Text sent for a text-like field; `None` for empty values and files.
    pub fn as_form_text(&self) -> Option<String> {
        match self {
            FieldValue::Null | FieldValue::File(_) => None,
            FieldValue::Bool(b) => Some(b.to_string()),
            FieldValue::Number(n) => Some(n.to_string()),
            FieldValue::Text(s) => Some(s.clone()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<FileUpload> for FieldValue {
    fn from(upload: FileUpload) -> Self {
        FieldValue::File(upload)
    }
}

/// Right-hand side of a collection filter: one value or a set of accepted values.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    One(Value),
    AnyOf(Vec<Value>),
}

impl FilterValue {
    pub fn matches(&self, candidate: &Value) -> bool {
        match self {
            FilterValue::One(value) => value == candidate,
            FilterValue::AnyOf(values) => values.contains(candidate),
        }
    }
}

impl From<Value> for FilterValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(values) => FilterValue::AnyOf(values),
            other => FilterValue::One(other),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::One(Value::from(value))
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::One(Value::from(value))
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::One(Value::from(value))
    }
}

impl<T: Into<Value>> From<Vec<T>> for FilterValue {
    fn from(values: Vec<T>) -> Self {
        FilterValue::AnyOf(values.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_serializes_with_type_tag() {
        let message = Message::http_error(400, "submitting form", "name is required");
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({ "type": "danger", "content": "400 Error submitting form: name is required" })
        );
    }

    #[test]
    fn test_field_value_untagged() {
        let values: FormValues =
            serde_json::from_value(json!({ "name": "Badge", "notify": true, "image": null }))
                .unwrap();
        assert_eq!(values["name"], FieldValue::from("Badge"));
        assert_eq!(values["notify"], FieldValue::Bool(true));
        assert!(values["image"].is_null());
    }

    #[test]
    fn test_form_text() {
        assert_eq!(FieldValue::from("a").as_form_text().as_deref(), Some("a"));
        assert_eq!(FieldValue::Bool(false).as_form_text().as_deref(), Some("false"));
        assert_eq!(FieldValue::Null.as_form_text(), None);
        let upload = FileUpload {
            filename: "badge.png".into(),
            bytes: vec![1, 2],
        };
        assert_eq!(FieldValue::from(upload).as_form_text(), None);
    }

    #[test]
    fn test_filter_value_matching() {
        let any = FilterValue::from(vec![1, 3]);
        assert!(any.matches(&json!(1)));
        assert!(!any.matches(&json!(2)));

        let one = FilterValue::from("x");
        assert!(one.matches(&json!("x")));
        assert_eq!(FilterValue::from(json!([1])), FilterValue::AnyOf(vec![json!(1)]));
    }
}

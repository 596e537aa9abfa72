//! Effects returned by store handlers and the executor that runs them
//!
//! Handlers never touch the network. They return an [`Effect`]; the
//! [`EffectRunner`] turns it into a request on a tokio task, and the task's
//! outcome comes back as a result action (`ApiGetDataDidLoad`,
//! `ApiFormResultFailure`, ...).

use std::sync::Arc;

use badgeflow::TaskManager;
use serde_json::Value;
use tracing::warn;

use crate::action::{ApiFailure, AppAction};
use crate::context::RequestContext;
use crate::model::{FieldValue, FormId, FormValues, Message};
use crate::stores::form_config::FieldSpec;
use crate::transport::{ApiRequest, FormPart, RequestBody, Transport};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// GET `context.action_url` into `context.api_collection_key`.
    GetData(RequestContext),
    /// Multipart submission of a form.
    PostForm {
        form_id: FormId,
        fields: Vec<FieldSpec>,
        values: FormValues,
        context: RequestContext,
        success_message: String,
    },
    /// JSON request followed by a partial update.
    RequestData {
        data: Option<Value>,
        context: RequestContext,
    },
}

/// Multipart parts for a form submission.
///
/// Text-like fields with a value become text parts; file fields holding an
/// upload become file parts named after the field's configured filename.
pub fn multipart_parts(fields: &[FieldSpec], values: &FormValues) -> Vec<FormPart> {
    let mut parts = Vec::new();
    for field in fields {
        let Some(value) = values.get(&field.name) else {
            continue;
        };
        if field.kind.is_file() {
            if let FieldValue::File(upload) = value {
                parts.push(FormPart::File {
                    name: field.name.clone(),
                    filename: field
                        .filename
                        .clone()
                        .unwrap_or_else(|| upload.filename.clone()),
                    bytes: upload.bytes.clone(),
                });
            }
        } else if let Some(text) = value.as_form_text() {
            parts.push(FormPart::Text {
                name: field.name.clone(),
                value: text,
            });
        }
    }
    parts
}

/// Send `request` and parse the body when the status counts as success.
async fn exchange(
    transport: &dyn Transport,
    request: ApiRequest,
    context: &RequestContext,
) -> Result<Value, ApiFailure> {
    let method = request.method;
    let response = transport.send(request).await.map_err(|e| {
        warn!(%method, url = %context.action_url, error = %e, "Request failed");
        ApiFailure::Transport(e.to_string())
    })?;

    if !context.is_success(response.status) {
        warn!(
            %method,
            url = %context.action_url,
            status = response.status,
            "Unexpected response status"
        );
        return Err(ApiFailure::Status {
            status: response.status,
            body: response.body,
        });
    }

    response.json().map_err(|e| {
        warn!(url = %context.action_url, error = %e, "Response is not JSON");
        ApiFailure::Transport(format!("invalid response body: {}", e))
    })
}

pub async fn get_data(transport: Arc<dyn Transport>, context: RequestContext) -> AppAction {
    let request = ApiRequest::get(context.action_url.as_str());
    match exchange(transport.as_ref(), request, &context).await {
        Ok(body) => AppAction::ApiGetDataDidLoad { context, body },
        Err(failure) => AppAction::ApiGetDataDidFail { context, failure },
    }
}

pub async fn post_form(
    transport: Arc<dyn Transport>,
    form_id: FormId,
    fields: Vec<FieldSpec>,
    values: FormValues,
    context: RequestContext,
    success_message: String,
) -> AppAction {
    let request = ApiRequest::new(context.method, context.action_url.as_str())
        .with_body(RequestBody::Multipart(multipart_parts(&fields, &values)));
    match exchange(transport.as_ref(), request, &context).await {
        Ok(result) => AppAction::ApiFormResultSuccess {
            form_id,
            context,
            result,
            message: Message::success(success_message),
        },
        Err(failure) => AppAction::ApiFormResultFailure {
            form_id,
            message: failure.message("submitting form"),
        },
    }
}

pub async fn request_data(
    transport: Arc<dyn Transport>,
    data: Option<Value>,
    context: RequestContext,
) -> AppAction {
    let body = data.map_or(RequestBody::Empty, RequestBody::Json);
    let request = ApiRequest::new(context.method, context.action_url.as_str()).with_body(body);
    match exchange(transport.as_ref(), request, &context).await {
        Ok(body) => AppAction::ApiSubmitDataDidSucceed { context, body },
        Err(failure) => AppAction::ApiSubmitDataDidFail { context, failure },
    }
}

/// Runs effects as tasks against a transport.
#[derive(Clone)]
pub struct EffectRunner {
    transport: Arc<dyn Transport>,
}

impl EffectRunner {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn handle(&self, effect: Effect, tasks: &mut TaskManager<AppAction>) {
        let transport = self.transport.clone();
        match effect {
            Effect::GetData(context) => {
                let key = format!("GET {}", context.action_url);
                tasks.spawn(key, get_data(transport, context));
            }
            Effect::PostForm {
                form_id,
                fields,
                values,
                context,
                success_message,
            } => {
                let key = format!("{} {} ({})", context.method, context.action_url, form_id);
                tasks.spawn(
                    key,
                    post_form(transport, form_id, fields, values, context, success_message),
                );
            }
            Effect::RequestData { data, context } => {
                let key = format!("{} {}", context.method, context.action_url);
                tasks.spawn(key, request_data(transport, data, context));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::HttpMethod;
    use crate::model::FileUpload;
    use crate::stores::form_config::{FormConfigStore, FormType};
    use crate::transport::MockTransport;
    use serde_json::json;

    fn issuer_form() -> (Vec<FieldSpec>, FormValues) {
        let config = FormConfigStore::default();
        let config = config.config(FormType::IssuerCreate).unwrap().clone();
        (config.fields, config.defaults)
    }

    #[test]
    fn test_multipart_parts_text_and_file() {
        let (fields, mut values) = issuer_form();
        values.insert("name".into(), "Acme".into());
        values.insert(
            "image".into(),
            FieldValue::File(FileUpload {
                filename: "local-logo.png".into(),
                bytes: vec![0x89, 0x50],
            }),
        );

        let parts = multipart_parts(&fields, &values);

        assert!(parts.contains(&FormPart::Text {
            name: "name".into(),
            value: "Acme".into()
        }));
        assert!(parts.contains(&FormPart::File {
            name: "image".into(),
            filename: "issuer_logo.png".into(),
            bytes: vec![0x89, 0x50],
        }));
    }

    #[test]
    fn test_multipart_skips_empty_file() {
        let (fields, values) = issuer_form();
        let parts = multipart_parts(&fields, &values);
        assert!(parts.iter().all(|p| p.name() != "image"));
        assert_eq!(parts.len(), 4);
    }

    #[tokio::test]
    async fn test_get_data_success_and_status_failure() {
        let mock = MockTransport::new();
        mock.respond_json(HttpMethod::Get, "/v1/earner/badges", 200, &json!([{ "id": 1 }]));
        mock.respond(HttpMethod::Get, "/v1/issuer/issuers", 403, "forbidden");
        let transport: Arc<dyn Transport> = Arc::new(mock);

        let ok = get_data(
            transport.clone(),
            RequestContext::get("/v1/earner/badges", "earner_badges"),
        )
        .await;
        assert!(matches!(
            ok,
            AppAction::ApiGetDataDidLoad { ref body, .. } if body == &json!([{ "id": 1 }])
        ));

        let failed = get_data(
            transport,
            RequestContext::get("/v1/issuer/issuers", "issuer_issuers"),
        )
        .await;
        match failed {
            AppAction::ApiGetDataDidFail { failure, .. } => {
                assert_eq!(
                    failure.message("getting data").content,
                    "403 Error getting data: forbidden"
                );
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_post_form_failure_message() {
        let mock = MockTransport::new();
        mock.respond(HttpMethod::Post, "/v1/issuer/issuers", 400, "{\"url\":[\"invalid\"]}");
        let (fields, values) = issuer_form();
        let context = RequestContext::get("/v1/issuer/issuers", "issuer_issuers")
            .with_method(HttpMethod::Post)
            .with_successful_status(&[201]);

        let action = post_form(
            Arc::new(mock.clone()),
            "issuer-create".into(),
            fields,
            values,
            context,
            "Issuer created.".into(),
        )
        .await;

        assert_eq!(
            action,
            AppAction::ApiFormResultFailure {
                form_id: "issuer-create".into(),
                message: Message::danger("400 Error submitting form: {\"url\":[\"invalid\"]}"),
            }
        );
        let requests = mock.requests();
        assert!(matches!(requests[0].body, RequestBody::Multipart(_)));
    }

    #[tokio::test]
    async fn test_request_data_sends_json_and_accepts_204() {
        let mock = MockTransport::new();
        mock.respond(HttpMethod::Delete, "/v1/earner/badges/7", 204, "");
        let context = RequestContext::get("/v1/earner/badges/7", "earner_badges")
            .with_method(HttpMethod::Delete)
            .with_successful_status(&[200, 204]);

        let data = Some(json!({ "reason": "dup" }));
        let action = request_data(Arc::new(mock.clone()), data, context).await;

        assert!(matches!(
            action,
            AppAction::ApiSubmitDataDidSucceed { ref body, .. } if body.is_null()
        ));
        assert_eq!(
            mock.requests()[0].body,
            RequestBody::Json(json!({ "reason": "dup" }))
        );
    }
}

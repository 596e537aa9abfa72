//! reqwest-backed transport with a cookie jar for the CSRF token

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::ACCEPT;
use reqwest::multipart;
use reqwest::{Client, Method, Url};
use tracing::debug;

use super::{ApiRequest, ApiResponse, FormPart, RequestBody, Transport, TransportError};
use crate::config::{ClientConfig, CSRF_HEADER};
use crate::context::HttpMethod;
use crate::error::ClientError;

pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
    jar: Arc<Jar>,
    csrf_cookie_name: String,
    csrf_token: Option<String>,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ClientError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(jar.clone())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url,
            jar,
            csrf_cookie_name: config.csrf_cookie_name.clone(),
            csrf_token: config.csrf_token.clone(),
        })
    }

    /// Cookie jar shared with the client, e.g. to seed a session cookie.
    pub fn cookie_jar(&self) -> &Arc<Jar> {
        &self.jar
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn csrf_token(&self, url: &Url) -> Option<String> {
        if let Some(token) = &self.csrf_token {
            return Some(token.clone());
        }
        let header = self.jar.cookies(url)?;
        cookie_value(header.to_str().ok()?, &self.csrf_cookie_name)
    }
}

/// Value of cookie `name` in a `Cookie` header (`a=1; b=2`).
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn multipart_form(parts: Vec<FormPart>) -> multipart::Form {
    parts.into_iter().fold(multipart::Form::new(), |form, part| match part {
        FormPart::Text { name, value } => form.text(name, value),
        FormPart::File {
            name,
            filename,
            bytes,
        } => form.part(name, multipart::Part::bytes(bytes).file_name(filename)),
    })
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self
            .base_url
            .join(&request.path)
            .map_err(|e| TransportError::InvalidUrl {
                url: request.path.clone(),
                reason: e.to_string(),
            })?;

        let mut builder = self
            .client
            .request(method(request.method), url.clone())
            .header(ACCEPT, "application/json");
        if let Some(token) = self.csrf_token(&url) {
            builder = builder.header(CSRF_HEADER, token);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(parts) => builder.multipart(multipart_form(parts)),
        };

        debug!(method = %request.method, url = %url, "Sending request");
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_value() {
        let header = "sessionid=abc; csrftoken=t0k3n; theme=dark";
        assert_eq!(cookie_value(header, "csrftoken").as_deref(), Some("t0k3n"));
        assert_eq!(cookie_value(header, "missing"), None);
    }

    #[test]
    fn test_csrf_token_from_jar() {
        let config = ClientConfig::default().with_base_url("https://badges.example.org");
        let transport = ReqwestTransport::new(&config).unwrap();
        let url = Url::parse("https://badges.example.org/v1/earner/badges").unwrap();
        assert_eq!(transport.csrf_token(&url), None);

        transport
            .cookie_jar()
            .add_cookie_str("csrftoken=from-cookie; Path=/", transport.base_url());
        assert_eq!(transport.csrf_token(&url).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn test_configured_csrf_token_wins() {
        let config = ClientConfig::default().with_csrf_token("fixed");
        let transport = ReqwestTransport::new(&config).unwrap();
        let url = transport.base_url().join("/v1/earner/badges").unwrap();
        assert_eq!(transport.csrf_token(&url).as_deref(), Some("fixed"));
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ClientConfig::default().with_base_url("not a url");
        assert!(matches!(
            ReqwestTransport::new(&config),
            Err(ClientError::InvalidBaseUrl { .. })
        ));
    }
}

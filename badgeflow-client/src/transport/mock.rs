//! In-memory transport for tests and offline demos

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use super::{ApiRequest, ApiResponse, Transport, TransportError};
use crate::context::HttpMethod;

#[derive(Debug, Clone)]
enum Reply {
    Respond(ApiResponse),
    Fail(String),
}

#[derive(Debug, Default)]
struct MockState {
    routes: HashMap<(HttpMethod, String), VecDeque<Reply>>,
    requests: Vec<ApiRequest>,
}

/// Answers requests from canned replies keyed by method and path.
///
/// Replies for a route are used in order; the last one repeats. Unknown routes
/// answer `404`.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, method: HttpMethod, path: &str, reply: Reply) -> &Self {
        self.lock()
            .routes
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn respond(
        &self,
        method: HttpMethod,
        path: &str,
        status: u16,
        body: impl Into<String>,
    ) -> &Self {
        self.push(method, path, Reply::Respond(ApiResponse::new(status, body)))
    }

    pub fn respond_json(&self, method: HttpMethod, path: &str, status: u16, body: &Value) -> &Self {
        self.respond(method, path, status, body.to_string())
    }

    /// Make the route fail without a response.
    pub fn fail(&self, method: HttpMethod, path: &str, reason: impl Into<String>) -> &Self {
        self.push(method, path, Reply::Fail(reason.into()))
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.lock().requests.clone()
    }

    pub fn request_count(&self, method: HttpMethod, path: &str) -> usize {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut state = self.lock();
        let key = (request.method, request.path.clone());
        state.requests.push(request);

        let reply = match state.routes.get_mut(&key) {
            Some(replies) if replies.len() > 1 => replies.pop_front(),
            Some(replies) => replies.front().cloned(),
            None => None,
        };
        match reply {
            Some(Reply::Respond(response)) => Ok(response),
            Some(Reply::Fail(reason)) => Err(TransportError::Unavailable(reason)),
            None => Ok(ApiResponse::new(404, "Not found")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_replies_in_order_then_repeat_last() {
        let mock = MockTransport::new();
        mock.respond(HttpMethod::Get, "/v1/earner/badges", 500, "boom")
            .respond_json(HttpMethod::Get, "/v1/earner/badges", 200, &json!([]));

        let first = mock.send(ApiRequest::get("/v1/earner/badges")).await.unwrap();
        let second = mock.send(ApiRequest::get("/v1/earner/badges")).await.unwrap();
        let third = mock.send(ApiRequest::get("/v1/earner/badges")).await.unwrap();

        assert_eq!(first.status, 500);
        assert_eq!(second.status, 200);
        assert_eq!(third.body, "[]");
        assert_eq!(mock.request_count(HttpMethod::Get, "/v1/earner/badges"), 3);
    }

    #[tokio::test]
    async fn test_unknown_route_and_failure() {
        let mock = MockTransport::new();
        mock.fail(HttpMethod::Post, "/v1/issuer/issuers", "connection reset");

        let missing = mock.send(ApiRequest::get("/nope")).await.unwrap();
        assert_eq!(missing.status, 404);

        let failed = mock
            .send(ApiRequest::new(HttpMethod::Post, "/v1/issuer/issuers"))
            .await;
        assert!(matches!(failed, Err(TransportError::Unavailable(_))));
        assert_eq!(mock.requests().len(), 2);
    }
}

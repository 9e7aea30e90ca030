//! Scriptable stand-in for the complaints backend, for integration tests.
//!
//! [`MockBackend`] binds an axum server to `127.0.0.1:0`, records every
//! request it receives, and answers from per-route response queues.
//! Queued responses are consumed in order; the last one keeps repeating.
//! Unscripted routes answer `404 {"detail": "Not found."}`.

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::task::JoinHandle;

pub use axum::http::{Method, StatusCode};

/// Prefix every backend path is served under.
pub const API_PREFIX: &str = "/api";

/// One canned response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: StatusCode,
    /// `None` sends an empty body.
    pub body: Option<Value>,
}

impl IntoResponse for MockResponse {
    fn into_response(self) -> Response {
        match self.body {
            Some(body) => (self.status, Json(body)).into_response(),
            None => self.status.into_response(),
        }
    }
}

/// A request as seen by the mock server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    /// Path relative to [`API_PREFIX`], e.g. `/auth/me/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Value of the `Authorization` header.
    pub fn authorization(&self) -> Option<&str> {
        self.header("authorization")
    }

    /// Body parsed as JSON, if it is JSON.
    pub fn json(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
struct MockState {
    routes: HashMap<(Method, String), VecDeque<MockResponse>>,
    requests: Vec<RecordedRequest>,
}

impl MockState {
    fn next_response(&mut self, method: &Method, path: &str) -> MockResponse {
        match self.routes.get_mut(&(method.clone(), path.to_string())) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_else(not_found),
            Some(queue) => queue.front().cloned().unwrap_or_else(not_found),
            None => not_found(),
        }
    }
}

fn not_found() -> MockResponse {
    MockResponse {
        status: StatusCode::NOT_FOUND,
        body: Some(serde_json::json!({"detail": "Not found."})),
    }
}

/// Running mock backend. The server stops when this is dropped.
pub struct MockBackend {
    addr: SocketAddr,
    state: Arc<Mutex<MockState>>,
    server: JoinHandle<()>,
}

impl MockBackend {
    /// Bind to an ephemeral local port and start serving.
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(MockState::default()));
        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend address");

        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Mock backend stopped");
            }
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// Base URL to hand to the client, e.g. `http://127.0.0.1:41234/api`.
    pub fn base_url(&self) -> String {
        format!("http://{}{}", self.addr, API_PREFIX)
    }

    /// Queue a JSON response for `method path`.
    pub fn on(&self, method: Method, path: &str, status: u16, body: Value) -> &Self {
        self.push(method, path, status, Some(body))
    }

    /// Queue an empty-bodied response for `method path`.
    pub fn on_empty(&self, method: Method, path: &str, status: u16) -> &Self {
        self.push(method, path, status, None)
    }

    fn push(&self, method: Method, path: &str, status: u16, body: Option<Value>) -> &Self {
        let status = StatusCode::from_u16(status).expect("valid status code");
        self.state
            .lock()
            .routes
            .entry((method, path.to_string()))
            .or_default()
            .push_back(MockResponse { status, body });
        self
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().requests.clone()
    }

    /// Requests received for `method path`, in arrival order.
    pub fn requests_to(&self, method: Method, path: &str) -> Vec<RecordedRequest> {
        self.state
            .lock()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .cloned()
            .collect()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests_to(method, path).len()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn handle(
    State(state): State<Arc<Mutex<MockState>>>,
    method: Method,
    uri: axum::http::Uri,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    body: Bytes,
) -> MockResponse {
    let path = uri
        .path()
        .strip_prefix(API_PREFIX)
        .unwrap_or(uri.path())
        .to_string();

    let mut state = state.lock();
    let response = state.next_response(&method, &path);
    state.requests.push(RecordedRequest {
        method,
        path,
        query,
        headers,
        body,
    });
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_responses_are_consumed_then_repeat() {
        let backend = MockBackend::start().await;
        backend
            .on(Method::GET, "/ping/", 500, serde_json::json!({"detail": "boom"}))
            .on(Method::GET, "/ping/", 200, serde_json::json!({"ok": true}));

        let client = reqwest::Client::new();
        let url = format!("{}/ping/?a=1", backend.base_url());
        let statuses = [
            client.get(&url).send().await.unwrap().status().as_u16(),
            client.get(&url).send().await.unwrap().status().as_u16(),
            client.get(&url).send().await.unwrap().status().as_u16(),
        ];
        assert_eq!(statuses, [500, 200, 200]);

        let recorded = backend.requests_to(Method::GET, "/ping/");
        assert_eq!(recorded.len(), 3);
        assert_eq!(recorded[0].query_value("a"), Some("1"));
    }

    #[tokio::test]
    async fn unscripted_routes_are_not_found() {
        let backend = MockBackend::start().await;
        let response = reqwest::Client::new()
            .post(format!("{}/missing/", backend.base_url()))
            .body("hello")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 404);
        assert_eq!(backend.requests()[0].body_text(), "hello");
        assert_eq!(backend.count(Method::POST, "/missing/"), 1);
    }
}

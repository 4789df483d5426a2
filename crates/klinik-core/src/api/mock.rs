//! Scripted transport for tests.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{ApiClient, ApiRequest, ApiResponse, Method, Transport, TransportError};

/// Base URL the mock client is built with.
pub const MOCK_BASE_URL: &str = "http://mock.klinik";

#[derive(Debug, Clone)]
enum MockReply {
    Respond(ApiResponse),
    Fail(String),
}

#[derive(Default)]
struct MockState {
    routes: HashMap<(Method, String), MockReply>,
    requests: Vec<ApiRequest>,
}

/// Transport answering from a route table and recording every request.
///
/// Clones share state, so a test keeps a handle after boxing one into a client.
/// Unknown routes answer `404 Not Found`.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client over a clone of this transport.
    pub fn client(&self) -> ApiClient {
        ApiClient::new(MOCK_BASE_URL, Box::new(self.clone()))
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Answer `method path` with a raw body.
    pub fn on(&self, method: Method, path: &str, status: u16, body: impl Into<String>) -> &Self {
        let reply = MockReply::Respond(ApiResponse {
            status,
            body: body.into(),
        });
        self.lock().routes.insert((method, path.to_string()), reply);
        self
    }

    /// Answer `method path` with a JSON body.
    pub fn on_json(&self, method: Method, path: &str, status: u16, body: Value) -> &Self {
        self.on(method, path, status, body.to_string())
    }

    /// Fail `method path` at the transport level.
    pub fn fail(&self, method: Method, path: &str, message: &str) -> &Self {
        self.lock()
            .routes
            .insert((method, path.to_string()), MockReply::Fail(message.to_string()));
        self
    }

    /// Every request seen so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.lock().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    /// Requests sent to `method path`.
    pub fn requests_to(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        let url = format!("{}{}", MOCK_BASE_URL, path);
        self.lock()
            .requests
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .cloned()
            .collect()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut state = self.lock();
        state.requests.push(request.clone());

        let path = request
            .url
            .strip_prefix(MOCK_BASE_URL)
            .unwrap_or(&request.url)
            .to_string();

        match state.routes.get(&(request.method, path)) {
            Some(MockReply::Respond(response)) => Ok(response.clone()),
            Some(MockReply::Fail(message)) => Err(TransportError(message.clone())),
            None => Ok(ApiResponse {
                status: 404,
                body: "Not Found".into(),
            }),
        }
    }
}

//! REST API client.
//!
//! The only piece that talks to the network. Everything goes through a
//! [`Transport`], so tests swap in [`MockTransport`] and nothing else.

mod http;
mod mock;

pub use http::*;
pub use mock::*;

use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// API errors.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error! status: {status}, message: {body}")]
    Http { status: u16, body: String },

    #[error("{0}")]
    Transport(String),

    #[error("Data tidak dalam format array yang diharapkan: {0}")]
    Malformed(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<TransportError> for ApiError {
    fn from(e: TransportError) -> Self {
        ApiError::Transport(e.0)
    }
}

impl ApiError {
    /// Status code for HTTP failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Failure below HTTP: DNS, connect, TLS, reading the body.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct TransportError(pub String);

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Multipart(MultipartForm),
}

/// Multipart form: text fields plus at most one file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    pub fields: Vec<(String, String)>,
    pub file: Option<FilePart>,
}

impl MultipartForm {
    /// Value of a text field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// File attached to a multipart form.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    /// Form field name
    pub field: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// A fully resolved request handed to the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub bearer: Option<String>,
    pub body: Option<RequestBody>,
}

/// Raw response from the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network seam.
pub trait Transport: Send {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Client for the clinic REST API.
pub struct ApiClient {
    base_url: String,
    transport: Box<dyn Transport>,
}

impl ApiClient {
    /// Create a client over any transport.
    pub fn new(base_url: impl Into<String>, transport: Box<dyn Transport>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            transport,
        }
    }

    /// Create a client that talks HTTP.
    pub fn http(base_url: impl Into<String>) -> ApiResult<Self> {
        let transport = HttpTransport::new()?;
        Ok(Self::new(base_url, Box::new(transport)))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Issue a request and return the raw response, failing on non-2xx.
    pub fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
        bearer: Option<&str>,
    ) -> ApiResult<ApiResponse> {
        let request = ApiRequest {
            method,
            url: self.url(path),
            bearer: bearer.map(str::to_string),
            body,
        };

        let response = self.transport.send(&request)?;
        debug!(%method, path, status = response.status, "API response");

        if !response.is_success() {
            return Err(ApiError::Http {
                status: response.status,
                body: response.body,
            });
        }
        Ok(response)
    }

    /// Issue a request and parse the JSON body. An empty body is `Null`.
    pub fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
        bearer: Option<&str>,
    ) -> ApiResult<Value> {
        let response = self.send(method, path, body, bearer)?;
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    pub fn get(&self, bearer: &str, path: &str) -> ApiResult<Value> {
        self.request(Method::Get, path, None, Some(bearer))
    }

    /// GET a collection; anything but a JSON array is malformed.
    pub fn get_list(&self, bearer: &str, path: &str) -> ApiResult<Vec<Value>> {
        match self.get(bearer, path)? {
            Value::Array(items) => Ok(items),
            other => Err(ApiError::Malformed(other.to_string())),
        }
    }

    pub fn post(&self, bearer: &str, path: &str, body: Value) -> ApiResult<Value> {
        self.request(Method::Post, path, Some(RequestBody::Json(body)), Some(bearer))
    }

    pub fn put(&self, bearer: &str, path: &str, body: Value) -> ApiResult<Value> {
        self.request(Method::Put, path, Some(RequestBody::Json(body)), Some(bearer))
    }

    /// DELETE; the response body is ignored.
    pub fn delete(&self, bearer: &str, path: &str) -> ApiResult<()> {
        self.send(Method::Delete, path, None, Some(bearer))?;
        Ok(())
    }

    /// POST without credentials (login).
    pub fn post_public(&self, path: &str, body: Value) -> ApiResult<Value> {
        self.request(Method::Post, path, Some(RequestBody::Json(body)), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_url_joining() {
        let mock = MockTransport::new();
        let client = ApiClient::new("https://example.test/api/", Box::new(mock));
        assert_eq!(client.url("/patients"), "https://example.test/api/patients");
        assert_eq!(client.url("patients/3"), "https://example.test/api/patients/3");
    }

    #[test]
    fn test_attaches_bearer() {
        let mock = MockTransport::new();
        mock.on_json(Method::Get, "/patients", 200, json!([]));
        let client = mock.client();

        client.get("T1", "/patients").unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].bearer.as_deref(), Some("T1"));
        assert_eq!(requests[0].method, Method::Get);
    }

    #[test]
    fn test_public_post_has_no_bearer() {
        let mock = MockTransport::new();
        mock.on_json(Method::Post, "/login", 200, json!({"access_token": "T1"}));
        let client = mock.client();

        let body = client
            .post_public("/login", json!({"email": "a@b.com", "password": "x"}))
            .unwrap();
        assert_eq!(body["access_token"], "T1");
        assert_eq!(mock.requests()[0].bearer, None);
    }

    #[test]
    fn test_non_success_is_http_error() {
        let mock = MockTransport::new();
        mock.on(Method::Get, "/patients", 401, "Unauthenticated.");
        let client = mock.client();

        let err = client.get("T1", "/patients").unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(
            err.to_string(),
            "HTTP error! status: 401, message: Unauthenticated."
        );
    }

    #[test]
    fn test_transport_failure() {
        let mock = MockTransport::new();
        mock.fail(Method::Get, "/patients", "connection refused");
        let client = mock.client();

        let err = client.get("T1", "/patients").unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn test_list_must_be_array() {
        let mock = MockTransport::new();
        mock.on_json(Method::Get, "/patients", 200, json!({"data": []}));
        let client = mock.client();

        let err = client.get_list("T1", "/patients").unwrap_err();
        assert!(matches!(err, ApiError::Malformed(_)));
        assert!(err.to_string().contains(r#"{"data":[]}"#));
    }

    #[test]
    fn test_empty_body_is_null() {
        let mock = MockTransport::new();
        mock.on(Method::Put, "/patients/1", 204, "");
        let client = mock.client();

        let value = client.put("T1", "/patients/1", json!({})).unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn test_delete_ignores_body() {
        let mock = MockTransport::new();
        mock.on(Method::Delete, "/patients/1", 200, "Deleted");
        let client = mock.client();

        assert!(client.delete("T1", "/patients/1").is_ok());
    }
}

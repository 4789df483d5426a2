//! HTTP transport over blocking reqwest.

use reqwest::blocking::{multipart, Client};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::time::Duration;

use super::{ApiRequest, ApiResponse, Method, MultipartForm, RequestBody, Transport, TransportError};

/// Production transport. No timeout, no retries.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Option::<Duration>::None)
            .build()
            .map_err(|e| TransportError(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self
            .client
            .request(method, &request.url)
            .header(ACCEPT, "application/json");

        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }

        builder = match &request.body {
            None => builder.header(CONTENT_TYPE, "application/json"),
            Some(RequestBody::Json(value)) => builder.json(value),
            // reqwest sets the multipart content type with its boundary
            Some(RequestBody::Multipart(form)) => builder.multipart(to_multipart(form)),
        };

        let response = builder
            .send()
            .map_err(|e| TransportError(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| TransportError(e.to_string()))?;

        Ok(ApiResponse { status, body })
    }
}

fn to_multipart(form: &MultipartForm) -> multipart::Form {
    let mut out = multipart::Form::new();
    for (name, value) in &form.fields {
        out = out.text(name.clone(), value.clone());
    }
    if let Some(file) = &form.file {
        let part = multipart::Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        out = out.part(file.field.clone(), part);
    }
    out
}

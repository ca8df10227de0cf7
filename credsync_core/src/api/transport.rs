use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde_json::Value;

use super::errors::MigrationError;

/// Header carrying the session token on every authenticated call.
pub const AUTH_HEADER: &str = "X-Tableau-Auth";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
}

/// One REST call, independent of the HTTP library that carries it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute path below the server base URL, e.g. `/api/3.19/sites`.
    pub path: String,
    /// Present only for authenticated calls.
    pub token: Option<String>,
    pub body: Option<Value>,
}

/// What came back: the status code and the decoded body.
///
/// An empty body decodes to `Value::Null`; a body that is not JSON is kept
/// verbatim as `Value::String`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub(crate) fn from_text(status: u16, text: &str) -> Self {
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
        };
        Self { status, body }
    }
}

/// A trait representing anything that can execute REST calls against the server.
///
/// `HttpTransport` is the real one; tests plug in a scripted fake.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Only fails when no HTTP response was obtained at all; any status code
    /// is returned as `Ok`.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, MigrationError>;
}

/// `Transport` over reqwest. Inherits reqwest's default timeouts.
pub struct HttpTransport {
    client: reqwest::Client,
    server_url: String,
}

impl HttpTransport {
    pub fn new(server_url: impl Into<String>) -> Self {
        let server_url: String = server_url.into();
        Self {
            client: reqwest::Client::new(),
            server_url: server_url.trim_end_matches('/').to_string(),
        }
    }

    fn headers(token: Option<&str>) -> Result<HeaderMap, MigrationError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = token {
            let value = HeaderValue::from_str(token)
                .map_err(|e| MigrationError::Auth(format!("Unusable session token: {}", e)))?;
            headers.insert(AUTH_HEADER, value);
        }
        Ok(headers)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, MigrationError> {
        let url = format!("{}{}", self.server_url, request.path);
        debug!("{:?} {}", request.method, url);

        let builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
        };
        let mut builder = builder.headers(Self::headers(request.token.as_deref())?);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        debug!("{} answered {} ({} bytes)", url, status, text.len());
        Ok(ApiResponse::from_text(status, &text))
    }
}

//! # HTTP Transport
//!
//! The seam between the client and the network.
//!
//! ```text
//! ┌──────────────┐   ApiRequest    ┌───────────────┐   HTTPS   ┌─────────┐
//! │ GrocyClient  │ ──────────────► │   Transport   │ ────────► │  Grocy  │
//! │              │ ◄────────────── │ (HttpTransport│ ◄──────── │         │
//! └──────────────┘   ApiResponse   │  or a fake)   │           └─────────┘
//!                                  └───────────────┘
//! ```
//!
//! A transport only moves bytes. Any status code, including 4xx/5xx, comes
//! back as an [`ApiResponse`]; deciding what a status means is the client's
//! job. Only failures to complete the exchange are [`TransportError`]s.

use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::error::{ConfigError, TransportError};

// =============================================================================
// Request / Response
// =============================================================================

/// HTTP verbs used by the Grocy API client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// A fully built request: URL, fixed headers and optional JSON body.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

/// Status and raw body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        ApiResponse {
            status,
            body: body.into(),
        }
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decodes the body as JSON; an empty body decodes as `null`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        let body = self.body.trim();
        serde_json::from_str(if body.is_empty() { "null" } else { body })
    }

    /// True when the body carries no value (`""` or `null`).
    pub fn is_empty(&self) -> bool {
        let body = self.body.trim();
        body.is_empty() || body == "null"
    }
}

// =============================================================================
// Transport Trait
// =============================================================================

/// Sends one request and waits for the response.
pub trait Transport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        (**self).send(request)
    }
}

// =============================================================================
// reqwest Transport
// =============================================================================

/// Blocking `reqwest` transport.
///
/// Timeouts and connection pooling are reqwest's defaults. Like every
/// `reqwest::blocking` client, it must not be created or used from inside
/// an async runtime.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, ConfigError> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(HttpTransport { client })
    }

    /// Wraps an already configured client.
    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        HttpTransport { client }
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let builder = match request.method {
            Method::Get => self.client.get(request.url.clone()),
            Method::Post => self.client.post(request.url.clone()),
        };

        let mut builder = builder.headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_success_range() {
        assert!(ApiResponse::new(200, "{}").is_success());
        assert!(ApiResponse::new(204, "").is_success());
        assert!(!ApiResponse::new(400, "{}").is_success());
        assert!(!ApiResponse::new(302, "").is_success());
    }

    #[test]
    fn test_response_empty_body() {
        assert!(ApiResponse::new(200, "").is_empty());
        assert!(ApiResponse::new(200, " null ").is_empty());
        assert!(!ApiResponse::new(200, "[]").is_empty());
    }

    #[test]
    fn test_response_json() {
        let items: Vec<i64> = ApiResponse::new(200, " [1, 2] ").json().unwrap();
        assert_eq!(items, vec![1, 2]);

        let missing: Option<Vec<i64>> = ApiResponse::new(200, "").json().unwrap();
        assert_eq!(missing, None);

        assert!(ApiResponse::new(200, "<html>").json::<Vec<i64>>().is_err());
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Post.to_string(), "POST");
    }
}

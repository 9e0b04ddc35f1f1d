//! # Client Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Remote API          │ │
//! │  │  (fatal)        │  │                 │  │                         │ │
//! │  │  MissingRequired│  │  Request        │  │  Rejected (HTTP 400)    │ │
//! │  │  InvalidValue   │  │  Body           │  │  Status (other non-2xx) │ │
//! │  │                 │  │                 │  │  Decode / NotFound      │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Config errors stop construction. Everything else is caught at the     │
//! │  operation boundary: reads turn it into None / [], writes return it.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use grocy_core::CoreError;
use serde_json::Value;
use thiserror::Error;

/// Result type alias for remote operations.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Client configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

// =============================================================================
// Transport Errors
// =============================================================================

/// Failure to complete an HTTP exchange at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection refused, DNS failure, timeout, TLS...
    #[error("Request failed: {0}")]
    Request(String),

    /// The response body could not be read.
    #[error("Failed to read response body: {0}")]
    Body(String),
}

// =============================================================================
// API Errors
// =============================================================================

/// Error value returned by write operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Grocy refused the request with a validation message (HTTP 400).
    #[error("Grocy rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Any other non-success status.
    #[error("Unexpected HTTP status {status}")]
    Status { status: u16 },

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response was not the JSON shape the operation expects.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Failed to encode request body: {0}")]
    Encode(String),

    /// A prerequisite lookup came back empty.
    #[error("Not found: {what}")]
    NotFound { what: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    /// Builds a `Rejected` error from an error response body.
    ///
    /// Grocy sends `{"error_message": "..."}`; some proxies send
    /// `{"error": "..."}`. Anything else is reported verbatim.
    pub fn rejected(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|json| {
                ["error_message", "error"]
                    .iter()
                    .find_map(|key| json.get(key).and_then(Value::as_str).map(str::to_string))
            })
            .unwrap_or_else(|| body.trim().to_string());

        ApiError::Rejected { status, message }
    }

    /// The remote-supplied message, when Grocy rejected the request.
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Grocy API Client
//!
//! One method per remote operation. Each method issues a small, fixed
//! number of sequential requests and returns once they complete.
//!
//! ## Request Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  client.get_locations()                                                 │
//! │       │                                                                 │
//! │       ▼  run(): enter LogHandle dispatcher + span "grocy{op=...}"       │
//! │  endpoint(["objects", "locations"])  → {base}/objects/locations         │
//! │       │                                                                 │
//! │       ▼  execute(): fixed headers, Transport::send                      │
//! │  ApiResponse { status, body }                                           │
//! │       │                                                                 │
//! │       ├── 2xx  → decode JSON → Vec<Location>                            │
//! │       ├── 400  → ApiError::Rejected { message }                         │
//! │       └── else → ApiError::Status / Transport / Decode                  │
//! │                                                                         │
//! │  Reads:  Err → error! event → None / []                                 │
//! │  Writes: Err → error! event → returned to the caller                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Operations are split by area: [`products`] (catalog and barcodes),
//! [`reference`] (categories, locations, units, stores) and [`stock`]
//! (stock details, purchases, unit conversion).

pub mod products;
pub mod reference;
pub mod stock;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, info_span};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult, ConfigError};
use crate::logging::LogHandle;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};

pub use products::CreateProductOutcome;

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "GROCY-API-KEY";

/// Client for a single Grocy instance.
///
/// Holds no mutable state: the base URL and header set are fixed at
/// construction, so sharing a client is as safe as sharing its transport.
pub struct GrocyClient<T: Transport = HttpTransport> {
    config: ClientConfig,
    headers: HeaderMap,
    transport: T,
    log: LogHandle,
}

impl<T: Transport> std::fmt::Debug for GrocyClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrocyClient")
            .field("config", &self.config)
            .field("log", &self.log)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Construction
// =============================================================================

impl GrocyClient<HttpTransport> {
    /// Builds a client over the default `reqwest` transport, logging to the
    /// caller's current dispatcher.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        Self::with_parts(config, HttpTransport::new()?, LogHandle::current())
    }

    /// Resolves configuration from arguments or `GROCY_API_URL` /
    /// `GROCY_API_KEY`, then builds the client.
    pub fn from_env(api_url: Option<&str>, api_key: Option<&str>) -> Result<Self, ConfigError> {
        Self::new(ClientConfig::from_env(api_url, api_key)?)
    }
}

impl<T: Transport> GrocyClient<T> {
    /// Builds a client over a custom transport.
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self, ConfigError> {
        Self::with_parts(config, transport, LogHandle::current())
    }

    /// Builds a client from all of its collaborators.
    pub fn with_parts(
        config: ClientConfig,
        transport: T,
        log: LogHandle,
    ) -> Result<Self, ConfigError> {
        let headers = build_headers(&config.api_key)?;

        log.in_scope(|| {
            info!(api_url = %config.base_url, "Initializing Grocy client");
        });

        Ok(GrocyClient {
            config,
            headers,
            transport,
            log,
        })
    }

    /// Replaces the logging handle.
    pub fn with_logger(mut self, log: LogHandle) -> Self {
        self.log = log;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The fixed header set sent with every request.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    // =========================================================================
    // Operation Boundary
    // =========================================================================

    /// Runs an operation inside the log handle and an operation span.
    fn run<R>(&self, operation: &'static str, f: impl FnOnce() -> R) -> R {
        self.log.in_scope(|| {
            let span = info_span!("grocy", op = operation);
            span.in_scope(f)
        })
    }

    /// Read boundary: failures are logged once and become `sentinel`.
    fn read<R>(
        &self,
        operation: &'static str,
        sentinel: R,
        fetch: impl FnOnce() -> ApiResult<R>,
    ) -> R {
        self.run(operation, || match fetch() {
            Ok(value) => value,
            Err(error) => {
                error!(operation, %error, "Grocy read failed");
                sentinel
            }
        })
    }

    /// Write boundary: failures are logged once and returned.
    fn write<R>(&self, operation: &'static str, f: impl FnOnce() -> ApiResult<R>) -> ApiResult<R> {
        self.run(operation, || {
            f().map_err(|error| {
                error!(operation, %error, "Grocy write failed");
                error
            })
        })
    }

    // =========================================================================
    // Request Helpers
    // =========================================================================

    /// `{base_url}/{segments...}`, each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.config.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn execute(&self, method: Method, url: Url, body: Option<Value>) -> ApiResult<ApiResponse> {
        debug!(%method, %url, "Sending request");

        let request = ApiRequest {
            method,
            url,
            headers: self.headers.clone(),
            body,
        };
        let response = self.transport.send(&request)?;

        debug!(status = response.status, "Received response");

        match response.status {
            _ if response.is_success() => Ok(response),
            400 => Err(ApiError::rejected(response.status, &response.body)),
            status => Err(ApiError::Status { status }),
        }
    }

    fn get_json<R: DeserializeOwned>(&self, url: Url) -> ApiResult<R> {
        Ok(self.execute(Method::Get, url, None)?.json()?)
    }

    /// GET where an empty or `null` body means "no such item".
    fn get_optional<R: DeserializeOwned>(&self, url: Url) -> ApiResult<Option<R>> {
        let response = self.execute(Method::Get, url, None)?;
        if response.is_empty() {
            return Ok(None);
        }
        Ok(Some(response.json()?))
    }

    fn post_json<B: Serialize, R: DeserializeOwned>(&self, url: Url, body: &B) -> ApiResult<R> {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        Ok(self.execute(Method::Post, url, Some(body))?.json()?)
    }
}

fn build_headers(api_key: &str) -> Result<HeaderMap, ConfigError> {
    let mut key = HeaderValue::from_str(api_key).map_err(|e| ConfigError::InvalidValue {
        name: crate::config::API_KEY_ENV.to_string(),
        reason: e.to_string(),
    })?;
    key.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(HeaderName::from_static("grocy-api-key"), key);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

// =============================================================================
// Unit Tests
// =============================================================================

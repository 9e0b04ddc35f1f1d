//! Client configuration.
//!
//! Resolution is a separate step from building the client, and the
//! environment is read through a lookup function so tests can supply their
//! own values without touching the process environment.
//!
//! ```text
//! explicit argument ──► GROCY_API_URL / GROCY_API_KEY ──► ConfigError
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use url::Url;

use crate::error::ConfigError;

/// Environment variable holding the Grocy API base URL.
pub const API_URL_ENV: &str = "GROCY_API_URL";

/// Environment variable holding the Grocy API key.
pub const API_KEY_ENV: &str = "GROCY_API_KEY";

/// Validated connection settings for a Grocy instance.
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API root, e.g. `https://grocy.local/api`.
    pub base_url: Url,

    /// Value of the `GROCY-API-KEY` header.
    pub api_key: String,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl ClientConfig {
    /// Validates explicitly supplied values.
    pub fn new(api_url: &str, api_key: &str) -> Result<Self, ConfigError> {
        let api_url = non_blank(Some(api_url.to_string()))
            .ok_or_else(|| ConfigError::MissingRequired(API_URL_ENV.to_string()))?;
        let api_key = non_blank(Some(api_key.to_string()))
            .ok_or_else(|| ConfigError::MissingRequired(API_KEY_ENV.to_string()))?;

        Ok(ClientConfig {
            base_url: parse_base_url(&api_url)?,
            api_key,
        })
    }

    /// Resolves each value from its argument, falling back to `lookup`
    /// with the matching environment variable name.
    pub fn resolve<F>(
        api_url: Option<&str>,
        api_key: Option<&str>,
        lookup: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = non_blank(api_url.map(str::to_string))
            .or_else(|| non_blank(lookup(API_URL_ENV)))
            .ok_or_else(|| ConfigError::MissingRequired(API_URL_ENV.to_string()))?;

        let api_key = non_blank(api_key.map(str::to_string))
            .or_else(|| non_blank(lookup(API_KEY_ENV)))
            .ok_or_else(|| ConfigError::MissingRequired(API_KEY_ENV.to_string()))?;

        Self::new(&api_url, &api_key)
    }

    /// [`resolve`](Self::resolve) against the process environment.
    pub fn from_env(api_url: Option<&str>, api_key: Option<&str>) -> Result<Self, ConfigError> {
        Self::resolve(api_url, api_key, |name| env::var(name).ok())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses the API root, dropping trailing slashes so paths join cleanly.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        name: API_URL_ENV.to_string(),
        reason,
    };

    let url = Url::parse(raw.trim_end_matches('/')).map_err(|e| invalid(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot be used as a base".to_string()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("URL must not carry a query or fragment".to_string()));
    }

    Ok(url)
}

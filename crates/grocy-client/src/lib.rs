//! # grocy-client: REST Client for Grocy
//!
//! Translates local calls into requests against a Grocy instance's REST
//! API: product lookup and creation, barcode assignment, purchase booking
//! and reference lists (categories, locations, units, stores).
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        grocy-client Architecture                        │
//! │                                                                         │
//! │  ┌──────────────┐      ┌──────────────────────────────────────────┐    │
//! │  │ ClientConfig │─────►│              GrocyClient                 │    │
//! │  │ base URL     │      │                                          │    │
//! │  │ API key      │      │  products   reference   stock            │    │
//! │  └──────────────┘      └───────┬──────────────────────┬───────────┘    │
//! │  ┌──────────────┐              │                      │                 │
//! │  │  LogHandle   │─────────────►│ spans + events       │ payload math    │
//! │  │ console+file │              ▼                      ▼                 │
//! │  └──────────────┘      ┌──────────────┐      ┌──────────────────┐      │
//! │                        │  Transport   │      │   grocy-core     │      │
//! │                        │ (reqwest)    │      │ barcode / units  │      │
//! │                        └──────┬───────┘      └──────────────────┘      │
//! │                               ▼                                         │
//! │                          Grocy REST API                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Policy
//!
//! - Configuration errors fail construction.
//! - Reads log one error and return `None` or an empty list.
//! - Writes log one error and return an [`ApiError`]; an HTTP 400 carries
//!   Grocy's own message in [`ApiError::Rejected`].
//!
//! Nothing is retried or cached.
//!
//! ## Modules
//!
//! - [`client`] - `GrocyClient` and its operations
//! - [`config`] - Base URL / API key resolution
//! - [`logging`] - Console + size-rotating file log sinks
//! - [`transport`] - HTTP seam and the `reqwest` implementation
//! - [`error`] - Client error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use grocy_client::{ClientConfig, GrocyClient, LogConfig, LogHandle};
//!
//! let log = LogHandle::init(&LogConfig::from_env("grocy"));
//! let config = ClientConfig::from_env(None, None)?;
//! let client = GrocyClient::new(config)?.with_logger(log);
//!
//! if let Some(details) = client.find_product_by_barcode("3600029145") {
//!     println!("{} in stock: {}", details.product.name, details.stock_amount);
//! }
//! # Ok::<(), grocy_client::ConfigError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod transport;

#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use client::{CreateProductOutcome, GrocyClient, API_KEY_HEADER};
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult, ConfigError, TransportError};
pub use logging::{LogConfig, LogHandle};
pub use transport::{HttpTransport, Transport};

pub use grocy_core;
pub use grocy_core::{build_upc_from_receipt, calculate_upc_check_digit, normalize_receipt_barcode};

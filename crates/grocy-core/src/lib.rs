//! # grocy-core: Pure Logic for the Grocy Client
//!
//! This crate holds everything in the Grocy client that can be computed
//! without touching the network: the data types exchanged with Grocy,
//! receipt barcode normalization, quantity unit conversion and the purchase
//! math that turns a receipt line into a stock booking.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Grocy Link Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  grocy-client (HTTP + logging)                  │   │
//! │  │   find_product_by_barcode, create_product, add_purchase, ...    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ grocy-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  barcode  │  │ conversion │  │ purchase  │  │   │
//! │  │   │  Product  │  │  UPC-A    │  │  qu factor │  │  payload  │  │   │
//! │  │   │  Barcode  │  │  checks   │  │  lookup    │  │  math     │  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO CLOCK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Grocy DTOs (Product, ProductBarcode, conversions, payloads)
//! - [`barcode`] - UPC-A check digits and receipt code normalization
//! - [`conversion`] - Quantity unit conversion lookup
//! - [`purchase`] - Purchase-to-stock booking math
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use grocy_core::barcode::normalize_receipt_barcode;
//!
//! // 10-digit register codes become scannable UPC-A barcodes
//! assert_eq!(normalize_receipt_barcode("3600029145"), "036000291452");
//!
//! // Everything else passes through untouched
//! assert_eq!(normalize_receipt_barcode("ABC123"), "ABC123");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod barcode;
pub mod conversion;
pub mod error;
pub mod purchase;
pub mod types;

mod lenient;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use barcode::{build_upc_from_receipt, calculate_upc_check_digit, normalize_receipt_barcode};
pub use conversion::convert_quantity;
pub use error::{BarcodeError, CoreError, CoreResult};
pub use purchase::build_purchase_payload;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Transaction type Grocy expects for stock added through a purchase.
pub const PURCHASE_TRANSACTION_TYPE: &str = "purchase";

/// Default number of stock units a scanned barcode represents.
pub const DEFAULT_BARCODE_AMOUNT: f64 = 1.0;

//! # Error Types
//!
//! Domain-specific error types for grocy-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  grocy-core errors (this file)                                         │
//! │  ├── CoreError     - Purchase / conversion math failures               │
//! │  └── BarcodeError  - Receipt code and UPC-A input failures             │
//! │                                                                         │
//! │  grocy-client errors (separate crate)                                  │
//! │  ├── ConfigError   - Missing credentials (fatal at construction)       │
//! │  └── ApiError      - Remote rejection, transport, decoding             │
//! │                                                                         │
//! │  Flow: BarcodeError → CoreError → ApiError → Caller                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised by the pure computations in this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// A purchase-to-stock factor that cannot be used to divide a price.
    ///
    /// ## When This Occurs
    /// - Product details report a factor of 0 (misconfigured product)
    /// - The factor came back as NaN or infinity
    #[error("Invalid conversion factor {factor} for product {product_id}")]
    InvalidConversionFactor { product_id: i64, factor: f64 },

    /// The best-before date would fall outside the supported calendar.
    #[error("Cannot compute a best-before date {days_out} days from today")]
    DateOutOfRange { days_out: i64 },

    /// Barcode error (wraps BarcodeError).
    #[error("Barcode error: {0}")]
    Barcode(#[from] BarcodeError),
}

// =============================================================================
// Barcode Error
// =============================================================================

/// Input errors for the UPC-A helpers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BarcodeError {
    /// Input had the wrong number of characters.
    #[error("Expected a {expected}-digit code, got {actual} characters")]
    WrongLength { expected: usize, actual: usize },

    /// Input contained something other than ASCII digits.
    #[error("Code must contain only digits: '{code}'")]
    NonDigit { code: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_barcode_error_messages() {
        let err = BarcodeError::WrongLength {
            expected: 11,
            actual: 3,
        };
        assert_eq!(err.to_string(), "Expected a 11-digit code, got 3 characters");

        let err = BarcodeError::NonDigit {
            code: "1234567890a".to_string(),
        };
        assert_eq!(err.to_string(), "Code must contain only digits: '1234567890a'");
    }

    #[test]
    fn test_barcode_converts_to_core_error() {
        let barcode_err = BarcodeError::NonDigit {
            code: "x".to_string(),
        };
        let core_err: CoreError = barcode_err.into();
        assert!(matches!(core_err, CoreError::Barcode(_)));
    }

    #[test]
    fn test_conversion_factor_message() {
        let err = CoreError::InvalidConversionFactor {
            product_id: 7,
            factor: 0.0,
        };
        assert_eq!(err.to_string(), "Invalid conversion factor 0 for product 7");
    }
}

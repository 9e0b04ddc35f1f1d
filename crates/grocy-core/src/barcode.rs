//! # Barcode Module
//!
//! UPC-A check digits and receipt barcode normalization.
//!
//! Some registers print a 10-digit internal item code on the receipt
//! instead of the full UPC-A printed on the package. Grocy matches barcodes
//! by exact string, so a product stored under the 10-digit code would never
//! be found by a later scan of the package. Normalizing before storage fixes
//! that.
//!
//! ## Normalization Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    normalize_receipt_barcode                            │
//! │                                                                         │
//! │  "3600029145"  (10 digits, receipt)                                    │
//! │       │                                                                 │
//! │       ▼  prepend "0"                                                   │
//! │  "03600029145" (11 digits)                                             │
//! │       │                                                                 │
//! │       ▼  calculate_upc_check_digit → "2"                               │
//! │  "036000291452" (12 digits, UPC-A)                                     │
//! │                                                                         │
//! │  Anything else ("ABC123", "036000291452", QR payloads) → unchanged     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use grocy_core::barcode::{calculate_upc_check_digit, build_upc_from_receipt};
//!
//! assert_eq!(calculate_upc_check_digit("03600029145").unwrap(), "2");
//! assert_eq!(build_upc_from_receipt("3600029145").unwrap(), "036000291452");
//! assert!(build_upc_from_receipt("123").is_err());
//! ```

use crate::error::BarcodeError;

/// Result type for barcode operations.
pub type BarcodeResult<T> = Result<T, BarcodeError>;

/// Length of a UPC-A code without its check digit.
pub const UPC_DATA_DIGITS: usize = 11;

/// Length of a complete UPC-A code.
pub const UPC_A_LENGTH: usize = 12;

/// Length of the internal item code some registers print on receipts.
pub const RECEIPT_CODE_LENGTH: usize = 10;

// =============================================================================
// Input Checks
// =============================================================================

/// Checks that `code` is exactly `expected` ASCII digits.
///
/// Length is counted in characters so that `"1234567890a"` reports a
/// non-digit rather than a length mismatch.
fn require_digits(code: &str, expected: usize) -> BarcodeResult<()> {
    let actual = code.chars().count();
    if actual != expected {
        return Err(BarcodeError::WrongLength { expected, actual });
    }

    if !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(BarcodeError::NonDigit {
            code: code.to_string(),
        });
    }

    Ok(())
}

fn is_digits_of_len(code: &str, len: usize) -> bool {
    code.len() == len && code.bytes().all(|b| b.is_ascii_digit())
}

/// Weighted UPC-A check digit over ASCII digits (even index ×3, odd ×1).
fn check_digit_of(digits: &[u8]) -> u8 {
    let total: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let digit = u32::from(b - b'0');
            if i % 2 == 0 {
                digit * 3
            } else {
                digit
            }
        })
        .sum();

    ((10 - (total % 10)) % 10) as u8
}

// =============================================================================
// Public API
// =============================================================================

/// Computes the UPC-A check digit for an 11-digit code.
///
/// ## Rules
/// - Input must be exactly 11 ASCII digits
/// - Digits at even (0-based) index weigh 3, odd index weigh 1
/// - Check digit = `(10 - (sum mod 10)) mod 10`
///
/// ## Example
/// ```rust
/// use grocy_core::barcode::calculate_upc_check_digit;
///
/// assert_eq!(calculate_upc_check_digit("03600029145").unwrap(), "2");
/// assert!(calculate_upc_check_digit("1234567890a").is_err());
/// ```
pub fn calculate_upc_check_digit(code11: &str) -> BarcodeResult<String> {
    require_digits(code11, UPC_DATA_DIGITS)?;

    let check = check_digit_of(code11.as_bytes());
    Ok(char::from(b'0' + check).to_string())
}

/// Builds a 12-digit UPC-A from a 10-digit receipt code.
///
/// Pads with a leading `0` and appends the computed check digit.
pub fn build_upc_from_receipt(receipt_code: &str) -> BarcodeResult<String> {
    require_digits(receipt_code, RECEIPT_CODE_LENGTH)?;

    let mut upc = String::with_capacity(UPC_A_LENGTH);
    upc.push('0');
    upc.push_str(receipt_code);

    let check = calculate_upc_check_digit(&upc)?;
    upc.push_str(&check);
    Ok(upc)
}

/// Returns the UPC-A for a 10-digit receipt code, or `code` unchanged.
///
/// Never fails: anything that is not exactly 10 digits is assumed to be in
/// a usable format already (full UPC/EAN codes, QR payloads, SKUs).
pub fn normalize_receipt_barcode(code: &str) -> String {
    if is_digits_of_len(code, RECEIPT_CODE_LENGTH) {
        // Length and digits were checked above, so this cannot fail.
        if let Ok(upc) = build_upc_from_receipt(code) {
            return upc;
        }
    }

    code.to_string()
}

/// Returns true if `code` is a 12-digit UPC-A with a correct check digit.
pub fn is_valid_upc_a(code: &str) -> bool {
    if !is_digits_of_len(code, UPC_A_LENGTH) {
        return false;
    }

    let bytes = code.as_bytes();
    check_digit_of(&bytes[..UPC_DATA_DIGITS]) == bytes[UPC_DATA_DIGITS] - b'0'
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_check_digit_reference_vectors() {
        // Published UPC-A examples
        assert_eq!(calculate_upc_check_digit("03600029145").unwrap(), "2");
        assert_eq!(calculate_upc_check_digit("01234567890").unwrap(), "5");
        assert_eq!(calculate_upc_check_digit("04210000526").unwrap(), "4");
        assert_eq!(calculate_upc_check_digit("00000000000").unwrap(), "0");
    }

    #[test]
    fn test_check_digit_rejects_bad_input() {
        assert_eq!(
            calculate_upc_check_digit("123"),
            Err(BarcodeError::WrongLength {
                expected: 11,
                actual: 3
            })
        );
        assert!(matches!(
            calculate_upc_check_digit("1234567890a"),
            Err(BarcodeError::NonDigit { .. })
        ));
        assert!(calculate_upc_check_digit("").is_err());
        assert!(calculate_upc_check_digit("0360002914").is_err());
        assert!(calculate_upc_check_digit("036000291452").is_err());
        assert!(calculate_upc_check_digit("0360002914 ").is_err());
        assert!(calculate_upc_check_digit("-3600029145").is_err());
    }

    #[test]
    fn test_check_digit_rejects_non_ascii_digits() {
        // Arabic-Indic digits are numeric but not barcode digits
        assert!(calculate_upc_check_digit("٠١٢٣٤٥٦٧٨٩٠").is_err());
    }

    #[test]
    fn test_build_upc_from_receipt() {
        assert_eq!(build_upc_from_receipt("3600029145").unwrap(), "036000291452");
        assert_eq!(build_upc_from_receipt("1234567890").unwrap(), "012345678905");
    }

    #[test]
    fn test_build_upc_rejects_bad_input() {
        assert!(build_upc_from_receipt("123").is_err());
        assert!(build_upc_from_receipt("123456789").is_err());
        assert!(build_upc_from_receipt("12345678901").is_err());
        assert!(matches!(
            build_upc_from_receipt("12345abcde"),
            Err(BarcodeError::NonDigit { .. })
        ));
    }

    #[test]
    fn test_normalize_receipt_barcode() {
        assert_eq!(normalize_receipt_barcode("1234567890"), "012345678905");
        assert_eq!(normalize_receipt_barcode("ABC123"), "ABC123");
        assert_eq!(normalize_receipt_barcode("123456789012"), "123456789012");
        assert_eq!(normalize_receipt_barcode("123456789"), "123456789");
        assert_eq!(normalize_receipt_barcode("12345abcde"), "12345abcde");
        assert_eq!(normalize_receipt_barcode(""), "");
    }

    #[test]
    fn test_is_valid_upc_a() {
        assert!(is_valid_upc_a("036000291452"));
        assert!(is_valid_upc_a("012345678905"));
        assert!(!is_valid_upc_a("036000291453"));
        assert!(!is_valid_upc_a("3600029145"));
        assert!(!is_valid_upc_a("03600029145a"));
    }

    proptest! {
        #[test]
        fn check_digit_completes_weighted_sum(code in "[0-9]{11}") {
            let check = calculate_upc_check_digit(&code).unwrap();
            prop_assert_eq!(check.len(), 1);

            let weighted: u32 = code
                .bytes()
                .enumerate()
                .map(|(i, b)| u32::from(b - b'0') * if i % 2 == 0 { 3 } else { 1 })
                .sum();
            let check: u32 = check.parse().unwrap();
            prop_assert_eq!((weighted + check) % 10, 0);
        }

        #[test]
        fn receipt_codes_become_valid_upc_a(code in "[0-9]{10}") {
            let upc = build_upc_from_receipt(&code).unwrap();
            prop_assert_eq!(upc.len(), 12);
            prop_assert!(upc.starts_with('0'));
            prop_assert_eq!(&upc[1..11], code.as_str());
            prop_assert_eq!(calculate_upc_check_digit(&upc[..11]).unwrap(), &upc[11..]);
            prop_assert!(is_valid_upc_a(&upc));
            prop_assert_eq!(normalize_receipt_barcode(&code), upc);
        }

        #[test]
        fn non_receipt_codes_pass_through(code in "[A-Za-z0-9]{0,9}|[0-9]{11,14}") {
            prop_assert_eq!(normalize_receipt_barcode(&code), code);
        }
    }
}

//! # Quantity Unit Conversion
//!
//! Converts an amount between two quantity units using Grocy's conversion
//! table.
//!
//! ```text
//! table: [{from: 1, to: 2, factor: 2.5}, ...]
//!
//! convert_quantity(table, 1, 2, 4.0) → 10.0   (first match, 4 × 2.5)
//! convert_quantity(table, 1, 3, 4.0) → 4.0    (no match, assumed 1:1)
//! ```
//!
//! The scan stops at the first row whose units match. If Grocy ever holds
//! more than one row for the same pair (e.g. a global and a product-specific
//! conversion), the result depends on the order the server returned them in.

use crate::types::QuantityUnitConversion;

/// Returns the first conversion from `from_qu_id` to `to_qu_id`.
pub fn find_conversion(
    table: &[QuantityUnitConversion],
    from_qu_id: i64,
    to_qu_id: i64,
) -> Option<&QuantityUnitConversion> {
    table
        .iter()
        .find(|c| c.from_qu_id == from_qu_id && c.to_qu_id == to_qu_id)
}

/// Converts `amount` from one unit to another; unknown pairs are 1:1.
pub fn convert_quantity(
    table: &[QuantityUnitConversion],
    from_qu_id: i64,
    to_qu_id: i64,
    amount: f64,
) -> f64 {
    match find_conversion(table, from_qu_id, to_qu_id) {
        Some(conversion) => amount * conversion.factor,
        None => amount,
    }
}

//! # Purchase Math
//!
//! Turns a receipt line (purchase units) into a Grocy stock booking
//! (stock units).
//!
//! ## Booking Calculation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Receipt: 2 packs of eggs @ 3.60, best before in 14 days               │
//! │  Product: 1 pack = 6 eggs  (qu_conversion_factor_purchase_to_stock)     │
//! │                                                                         │
//! │  amount           = 2 × 6        = 12 eggs                              │
//! │  price            = 3.60 ÷ 6     = 0.60 per egg                         │
//! │  best_before_date = today + 14                                          │
//! │  transaction_type = "purchase"                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `today` is a parameter: reading the clock is the caller's job.

use chrono::{Days, NaiveDate};

use crate::error::{CoreError, CoreResult};
use crate::types::{NewPurchase, PurchasePayload};
use crate::PURCHASE_TRANSACTION_TYPE;

/// Returns `today` shifted by `days_out` (negative values go back).
pub fn best_before_date(today: NaiveDate, days_out: i64) -> CoreResult<NaiveDate> {
    let shifted = if days_out >= 0 {
        today.checked_add_days(Days::new(days_out.unsigned_abs()))
    } else {
        today.checked_sub_days(Days::new(days_out.unsigned_abs()))
    };

    shifted.ok_or(CoreError::DateOutOfRange { days_out })
}

/// Builds the stock booking for `purchase` given the product's
/// purchase-to-stock factor.
///
/// ## Rules
/// - `amount` = purchase amount × factor
/// - `price` = purchase price ÷ factor (missing price books as 0)
/// - factor must be finite and positive
pub fn build_purchase_payload(
    purchase: &NewPurchase,
    factor: f64,
    today: NaiveDate,
) -> CoreResult<PurchasePayload> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(CoreError::InvalidConversionFactor {
            product_id: purchase.product_id,
            factor,
        });
    }

    Ok(PurchasePayload {
        amount: purchase.amount * factor,
        transaction_type: PURCHASE_TRANSACTION_TYPE.to_string(),
        best_before_date: best_before_date(today, purchase.days_out)?,
        price: purchase.price.unwrap_or(0.0) / factor,
        shopping_location_id: purchase.shopping_location_id,
    })
}

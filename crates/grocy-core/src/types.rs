//! # Grocy Types
//!
//! The data transfer objects exchanged with the Grocy REST API.
//!
//! Nothing here is cached or owned by the client: every value is decoded
//! from a response and handed to the caller, or built from caller input and
//! sent. Decoding is lenient about numeric columns (see `lenient`).
//!
//! ## Entity Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Grocy Entities                                  │
//! │                                                                         │
//! │  ProductGroup ──┐                           ┌── QuantityUnit            │
//! │  Location ──────┼──►  Product  ◄────────────┤   (purchase / stock)      │
//! │                 │       │                   └── QuantityUnitConversion  │
//! │                 │       ▼                                               │
//! │  ShoppingLocation ─► ProductBarcode                                     │
//! │                                                                         │
//! │  Caller input          Remote body          Remote response             │
//! │  ────────────          ───────────          ───────────────             │
//! │  NewProduct      ──►   ProductPayload  ──►  CreatedObject               │
//! │  BarcodeOptions  ──►   BarcodePayload  ──►  CreatedObject               │
//! │  NewPurchase     ──►   PurchasePayload ──►  stock booking JSON          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::barcode::normalize_receipt_barcode;
use crate::lenient;
use crate::DEFAULT_BARCODE_AMOUNT;

// =============================================================================
// Product
// =============================================================================

/// A product as stored in `/objects/products`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(deserialize_with = "lenient::id")]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Category.
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub product_group_id: Option<i64>,
    /// Default storage location.
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub location_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub qu_id_purchase: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub qu_id_stock: Option<i64>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub treat_opened_as_out_of_stock: bool,
}

/// Stock view of a product from `/stock/products/{id}` and the by-barcode
/// lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetails {
    pub product: Product,
    #[serde(default)]
    pub product_barcodes: Vec<ProductBarcode>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub stock_amount: f64,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub qu_conversion_factor_purchase_to_stock: Option<f64>,
}

impl ProductDetails {
    /// Factor converting purchase units into stock units (1 when unset).
    pub fn purchase_to_stock_factor(&self) -> f64 {
        self.qu_conversion_factor_purchase_to_stock.unwrap_or(1.0)
    }
}

// =============================================================================
// Barcodes
// =============================================================================

/// A barcode assigned to a product (`/objects/product_barcodes`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductBarcode {
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "lenient::id")]
    pub product_id: i64,
    pub barcode: String,
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub shopping_location_id: Option<i64>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub amount: Option<f64>,
}

/// Result of Grocy's external barcode lookup plugin.
///
/// Only the fields the client reads are typed; everything the plugin adds
/// is kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalBarcodeLookup {
    pub name: String,
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub location_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub qu_id_purchase: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub qu_id_stock: Option<i64>,
    #[serde(default, rename = "__barcode")]
    pub barcode: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// =============================================================================
// Reference Lists
// =============================================================================

/// A product category (`/objects/product_groups`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductGroup {
    #[serde(deserialize_with = "lenient::id")]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A storage location (`/objects/locations`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(deserialize_with = "lenient::id")]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_freezer: bool,
}

/// A quantity unit (`/objects/quantity_units`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityUnit {
    #[serde(deserialize_with = "lenient::id")]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub name_plural: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A store (`/objects/shopping_locations`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingLocation {
    #[serde(deserialize_with = "lenient::id")]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// One row of `/objects/quantity_unit_conversions`.
///
/// `amount_in_to_unit = amount_in_from_unit × factor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityUnitConversion {
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "lenient::id")]
    pub from_qu_id: i64,
    #[serde(deserialize_with = "lenient::id")]
    pub to_qu_id: i64,
    #[serde(deserialize_with = "lenient::number")]
    pub factor: f64,
    /// Set when the conversion only applies to one product.
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub product_id: Option<i64>,
}

/// Response to any object create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedObject {
    #[serde(deserialize_with = "lenient::id")]
    pub created_object_id: i64,
}

// =============================================================================
// Product Creation
// =============================================================================

/// Caller-supplied fields for a new product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub product_group_id: Option<i64>,
    #[serde(default)]
    pub location_id: Option<i64>,
    #[serde(default)]
    pub qu_id_purchase: Option<i64>,
    #[serde(default)]
    pub qu_id_stock: Option<i64>,
    /// Maps to `treat_opened_as_out_of_stock` (default false).
    #[serde(default)]
    pub out_of_stock_default: Option<bool>,
    /// Attached to the product after creation.
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub shopping_location_id: Option<i64>,
    #[serde(default)]
    pub barcode_amount: Option<f64>,
}

impl NewProduct {
    pub fn new(name: impl Into<String>) -> Self {
        NewProduct {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Maps the caller fields onto Grocy's product schema.
    pub fn to_payload(&self) -> ProductPayload {
        ProductPayload {
            name: self.name.clone(),
            description: self.description.clone().unwrap_or_default(),
            product_group_id: self.product_group_id,
            location_id: self.location_id,
            qu_id_purchase: self.qu_id_purchase,
            qu_id_stock: self.qu_id_stock,
            treat_opened_as_out_of_stock: self.out_of_stock_default.unwrap_or(false),
        }
    }

    /// The barcode to attach, if one was supplied and is not blank.
    pub fn barcode(&self) -> Option<&str> {
        self.barcode
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }

    /// Barcode options for the attach step; the note defaults to the name.
    pub fn barcode_options(&self) -> BarcodeOptions {
        BarcodeOptions {
            shopping_location_id: self.shopping_location_id,
            note: Some(self.name.clone()),
            amount: self.barcode_amount,
        }
    }
}

/// Body of `POST /objects/products`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPayload {
    pub name: String,
    pub description: String,
    pub product_group_id: Option<i64>,
    pub location_id: Option<i64>,
    pub qu_id_purchase: Option<i64>,
    pub qu_id_stock: Option<i64>,
    pub treat_opened_as_out_of_stock: bool,
}

// =============================================================================
// Barcode Assignment
// =============================================================================

/// Optional fields when attaching a barcode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BarcodeOptions {
    #[serde(default)]
    pub shopping_location_id: Option<i64>,
    #[serde(default)]
    pub note: Option<String>,
    /// Display amount (default 1).
    #[serde(default)]
    pub amount: Option<f64>,
}

/// Body of `POST /objects/product_barcodes`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarcodePayload {
    pub barcode: String,
    pub product_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopping_location_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub amount: f64,
}

impl BarcodePayload {
    /// Builds the body, normalizing 10-digit receipt codes to UPC-A.
    pub fn new(product_id: i64, barcode: &str, options: &BarcodeOptions) -> Self {
        BarcodePayload {
            barcode: normalize_receipt_barcode(barcode),
            product_id,
            shopping_location_id: options.shopping_location_id,
            note: options.note.clone(),
            amount: options.amount.unwrap_or(DEFAULT_BARCODE_AMOUNT),
        }
    }
}

// =============================================================================
// Purchases
// =============================================================================

/// A receipt line to book into stock, expressed in purchase units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPurchase {
    pub product_id: i64,
    pub amount: f64,
    /// Days from today until the best-before date.
    #[serde(default)]
    pub days_out: i64,
    #[serde(default)]
    pub shopping_location_id: Option<i64>,
    /// Price per purchase unit.
    #[serde(default)]
    pub price: Option<f64>,
}

/// Body of `POST /stock/products/{id}/add`, in stock units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchasePayload {
    pub amount: f64,
    pub transaction_type: String,
    /// Serialized as `YYYY-MM-DD`.
    pub best_before_date: NaiveDate,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopping_location_id: Option<i64>,
}

// =============================================================================
// Unit Tests
// =============================================================================

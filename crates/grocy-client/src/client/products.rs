//! # Product Operations
//!
//! Catalog reads, product creation and barcode assignment.
//!
//! ## Create Product Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_product(NewProduct)                                             │
//! │       │                                                                 │
//! │       ▼  POST /objects/products                                         │
//! │       ├── 2xx  → GET /objects/products/{created_object_id}              │
//! │       │            ├── found  → Created(product)                        │
//! │       │            └── failed → NotFound                                │
//! │       ├── 400  → Err(Rejected { message })      (no name lookup)        │
//! │       └── other failure → scan products for exact name                  │
//! │                    ├── found  → FoundExisting(product)                  │
//! │                    └── none   → NotFound                                │
//! │       │                                                                 │
//! │       ▼  product known + barcode supplied?                              │
//! │  POST /objects/product_barcodes  → error replaces the outcome           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The name lookup covers the case where Grocy created the product but the
//! response was lost, or a concurrent create for the same name won.

use grocy_core::barcode::normalize_receipt_barcode;
use grocy_core::{
    BarcodeOptions, BarcodePayload, CreatedObject, ExternalBarcodeLookup, NewProduct, Product,
    ProductDetails,
};
use tracing::{error, info, warn};

use super::GrocyClient;
use crate::error::{ApiError, ApiResult};
use crate::transport::Transport;

/// How `create_product` resolved the product.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateProductOutcome {
    /// Grocy created the product and it was fetched back.
    Created(Product),
    /// The create call failed and a product with the same name exists.
    FoundExisting(Product),
    /// Nothing could be resolved.
    NotFound,
}

impl CreateProductOutcome {
    pub fn product(&self) -> Option<&Product> {
        match self {
            CreateProductOutcome::Created(p) | CreateProductOutcome::FoundExisting(p) => Some(p),
            CreateProductOutcome::NotFound => None,
        }
    }

    pub fn into_product(self) -> Option<Product> {
        match self {
            CreateProductOutcome::Created(p) | CreateProductOutcome::FoundExisting(p) => Some(p),
            CreateProductOutcome::NotFound => None,
        }
    }
}

impl<T: Transport> GrocyClient<T> {
    // =========================================================================
    // Fallible Fetches
    // =========================================================================

    pub(super) fn fetch_product(&self, product_id: i64) -> ApiResult<Option<Product>> {
        let id = product_id.to_string();
        self.get_optional(self.endpoint(&["objects", "products", &id]))
    }

    pub(super) fn fetch_all_products(&self) -> ApiResult<Vec<Product>> {
        Ok(self
            .get_json::<Option<Vec<Product>>>(self.endpoint(&["objects", "products"]))?
            .unwrap_or_default())
    }

    fn fetch_product_by_name(&self, name: &str) -> ApiResult<Option<Product>> {
        Ok(self
            .fetch_all_products()?
            .into_iter()
            .find(|product| product.name == name))
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Looks a product up by barcode.
    ///
    /// The barcode is normalized first, so a 10-digit receipt code finds the
    /// product stored under its UPC-A.
    pub fn find_product_by_barcode(&self, barcode: &str) -> Option<ProductDetails> {
        self.read("find_product_by_barcode", None, || {
            let barcode = normalize_receipt_barcode(barcode);
            info!(%barcode, "Finding product by barcode");
            self.get_optional(self.endpoint(&["stock", "products", "by-barcode", &barcode]))
        })
    }

    /// Fetches a product by id.
    pub fn get_product(&self, product_id: i64) -> Option<Product> {
        self.read("get_product", None, || self.fetch_product(product_id))
    }

    /// Fetches the whole catalog.
    pub fn get_all_products(&self) -> Vec<Product> {
        self.read("get_all_products", Vec::new(), || self.fetch_all_products())
    }

    /// Fetches the products of one category.
    pub fn get_products_by_group(&self, product_group_id: i64) -> Vec<Product> {
        self.read("get_products_by_group", Vec::new(), || {
            let mut url = self.endpoint(&["objects", "products"]);
            url.query_pairs_mut()
                .append_pair("query[]", &format!("product_group_id={product_group_id}"));
            Ok(self.get_json::<Option<Vec<Product>>>(url)?.unwrap_or_default())
        })
    }

    /// First product whose name matches exactly.
    ///
    /// Scans the full catalog client-side; Grocy is not asked to filter.
    pub fn get_product_by_name(&self, name: &str) -> Option<Product> {
        self.read("get_product_by_name", None, || self.fetch_product_by_name(name))
    }

    /// Products whose name contains `query`, ignoring case.
    ///
    /// A blank query matches nothing and sends no request.
    pub fn search_products(&self, query: &str) -> Vec<Product> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.read("search_products", Vec::new(), || {
            Ok(self
                .fetch_all_products()?
                .into_iter()
                .filter(|product| product.name.to_lowercase().contains(&needle))
                .collect())
        })
    }

    /// Asks Grocy's external barcode lookup plugin about an unknown code
    /// without adding the result to the catalog.
    pub fn external_barcode_lookup(&self, barcode: &str) -> Option<ExternalBarcodeLookup> {
        self.read("external_barcode_lookup", None, || {
            let mut url = self.endpoint(&["stock", "barcodes", "external-lookup", barcode]);
            url.query_pairs_mut().append_pair("add", "false");
            self.get_optional(url)
        })
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Creates a product and attaches its barcode, if one was supplied.
    ///
    /// See the module docs for the full flow. `Err` carries either Grocy's
    /// validation message (HTTP 400 on create) or the barcode attach error.
    pub fn create_product(&self, new_product: &NewProduct) -> ApiResult<CreateProductOutcome> {
        self.run("create_product", || {
            let payload = new_product.to_payload();
            info!(name = %payload.name, "Creating product");

            let created: ApiResult<CreatedObject> =
                self.post_json(self.endpoint(&["objects", "products"]), &payload);

            let outcome = match created {
                Ok(created) => {
                    info!(product_id = created.created_object_id, "Product created");
                    match self.fetch_product(created.created_object_id) {
                        Ok(Some(product)) => CreateProductOutcome::Created(product),
                        Ok(None) => CreateProductOutcome::NotFound,
                        Err(error) => {
                            error!(%error, "Error fetching created product");
                            CreateProductOutcome::NotFound
                        }
                    }
                }
                Err(error @ ApiError::Rejected { .. }) => {
                    error!(%error, "Error creating product");
                    return Err(error);
                }
                Err(error) => {
                    warn!(%error, "Error creating product, trying by name");
                    match self.fetch_product_by_name(&new_product.name) {
                        Ok(Some(product)) => CreateProductOutcome::FoundExisting(product),
                        Ok(None) => CreateProductOutcome::NotFound,
                        Err(error) => {
                            error!(%error, "Error looking up product by name");
                            CreateProductOutcome::NotFound
                        }
                    }
                }
            };

            if let (Some(product), Some(barcode)) = (outcome.product(), new_product.barcode()) {
                info!(product_id = product.id, %barcode, "Attaching barcode");
                self.add_barcode_to_product(product.id, barcode, &new_product.barcode_options())?;
            }

            Ok(outcome)
        })
    }

    /// Assigns a barcode to a product.
    ///
    /// 10-digit receipt codes are stored as their UPC-A; the display amount
    /// defaults to 1.
    pub fn add_barcode_to_product(
        &self,
        product_id: i64,
        barcode: &str,
        options: &BarcodeOptions,
    ) -> ApiResult<CreatedObject> {
        self.write("add_barcode_to_product", || {
            let payload = BarcodePayload::new(product_id, barcode, options);
            info!(product_id, barcode = %payload.barcode, "Adding barcode");
            self.post_json(self.endpoint(&["objects", "product_barcodes"]), &payload)
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

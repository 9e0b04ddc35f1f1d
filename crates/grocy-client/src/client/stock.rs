//! # Stock Operations
//!
//! Stock details, purchase booking and purchase-to-stock unit conversion.
//!
//! ## Add Purchase Flow
//! ```text
//! add_purchase(NewPurchase { product_id, amount, days_out, price, .. })
//!      │
//!      ▼  GET /stock/products/{id}            (failure → NotFound)
//! factor = qu_conversion_factor_purchase_to_stock  (1 when unset)
//!      │
//!      ▼  grocy_core::build_purchase_payload(purchase, factor, today)
//!      │
//!      ▼  POST /stock/products/{id}/add
//! Grocy's response, as JSON
//! ```

use chrono::{Local, NaiveDate};
use grocy_core::{build_purchase_payload, convert_quantity, NewPurchase, ProductDetails};
use serde_json::Value;
use tracing::{info, warn};

use super::GrocyClient;
use crate::error::{ApiError, ApiResult};
use crate::transport::Transport;

impl<T: Transport> GrocyClient<T> {
    fn fetch_product_details(&self, product_id: i64) -> ApiResult<Option<ProductDetails>> {
        let id = product_id.to_string();
        self.get_optional(self.endpoint(&["stock", "products", &id]))
    }

    /// Stock view of a product, including its purchase-to-stock factor.
    pub fn get_product_details(&self, product_id: i64) -> Option<ProductDetails> {
        self.read("get_product_details", None, || {
            self.fetch_product_details(product_id)
        })
    }

    /// Books a purchase into stock, dated from today's local date.
    pub fn add_purchase(&self, purchase: &NewPurchase) -> ApiResult<Value> {
        self.add_purchase_on(purchase, Local::now().date_naive())
    }

    /// Books a purchase into stock with best-before computed from `today`.
    ///
    /// Amount and price are converted from purchase units to stock units
    /// with the product's factor before submission.
    pub fn add_purchase_on(&self, purchase: &NewPurchase, today: NaiveDate) -> ApiResult<Value> {
        self.write("add_purchase", || {
            let product_id = purchase.product_id;
            let details = match self.fetch_product_details(product_id) {
                Ok(Some(details)) => details,
                Ok(None) => return Err(product_not_found(product_id)),
                Err(error) => {
                    warn!(product_id, %error, "Could not load product details");
                    return Err(product_not_found(product_id));
                }
            };

            let factor = details.purchase_to_stock_factor();
            let payload = build_purchase_payload(purchase, factor, today)?;
            info!(
                product_id,
                amount = payload.amount,
                price = payload.price,
                best_before = %payload.best_before_date,
                "Adding purchase"
            );

            let id = product_id.to_string();
            self.post_json(self.endpoint(&["stock", "products", &id, "add"]), &payload)
        })
    }

    /// Converts `amount` between two units using Grocy's conversion table.
    ///
    /// Takes the first matching row; unknown pairs are 1:1. Unlike
    /// [`get_quantity_unit_conversions`](Self::get_quantity_unit_conversions),
    /// a failed table fetch is returned as an error.
    pub fn convert_purchase_quantities_to_stock(
        &self,
        from_qu_id: i64,
        to_qu_id: i64,
        amount: f64,
    ) -> ApiResult<f64> {
        self.write("convert_purchase_quantities_to_stock", || {
            let table = self.fetch_quantity_unit_conversions()?;
            Ok(convert_quantity(&table, from_qu_id, to_qu_id, amount))
        })
    }
}

fn product_not_found(product_id: i64) -> ApiError {
    ApiError::NotFound {
        what: format!("stock details for product {product_id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{client_with, logged_client_with, FakeTransport};
    use grocy_core::CoreError;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn eggs() -> NewPurchase {
        NewPurchase {
            product_id: 7,
            amount: 2.0,
            days_out: 14,
            shopping_location_id: Some(3),
            price: Some(3.6),
        }
    }

    fn details(factor: Value) -> Value {
        json!({
            "product": {"id": 7, "name": "Eggs", "qu_id_purchase": 4, "qu_id_stock": 2},
            "stock_amount": "6",
            "qu_conversion_factor_purchase_to_stock": factor
        })
    }

    fn conversions() -> Value {
        json!([
            {"id": 1, "from_qu_id": 1, "to_qu_id": 2, "factor": 2.5},
            {"id": 2, "from_qu_id": 4, "to_qu_id": 2, "factor": 6}
        ])
    }

    #[test]
    fn test_get_product_details() {
        let transport = FakeTransport::new().on_get_json("/stock/products/7", details(json!("6")));
        let client = client_with(&transport);

        let details = client.get_product_details(7).unwrap();
        assert_eq!(details.product.name, "Eggs");
        assert_eq!(details.stock_amount, 6.0);
        assert_eq!(details.purchase_to_stock_factor(), 6.0);
    }

    #[test]
    fn test_get_product_details_failure() {
        let transport = FakeTransport::new().fail_get("/stock/products/7");
        let (client, logs) = logged_client_with(&transport);

        assert_eq!(client.get_product_details(7), None);
        assert_eq!(logs.error_count(), 1);
    }

    #[test]
    fn test_add_purchase_converts_to_stock_units() {
        let transport = FakeTransport::new()
            .on_get_json("/stock/products/7", details(json!(6)))
            .on_post_json("/stock/products/7/add", json!([{"id": "101"}]));
        let client = client_with(&transport);

        let response = client.add_purchase_on(&eggs(), date(2024, 2, 20)).unwrap();
        assert_eq!(response, json!([{"id": "101"}]));
        assert_eq!(
            transport.calls(),
            vec!["GET /stock/products/7", "POST /stock/products/7/add"]
        );

        let body = transport.requests()[1].body.clone().unwrap();
        assert_eq!(body["amount"], 12.0);
        assert!((body["price"].as_f64().unwrap() - 0.6).abs() < 1e-9);
        assert_eq!(body["transaction_type"], "purchase");
        assert_eq!(body["best_before_date"], "2024-03-05");
        assert_eq!(body["shopping_location_id"], 3);
    }

    #[test]
    fn test_add_purchase_defaults_factor_and_price() {
        let transport = FakeTransport::new()
            .on_get_json("/stock/products/7", details(Value::Null))
            .on_post_json("/stock/products/7/add", json!({}));
        let client = client_with(&transport);

        let purchase = NewPurchase {
            price: None,
            shopping_location_id: None,
            days_out: 0,
            ..eggs()
        };
        client.add_purchase_on(&purchase, date(2024, 2, 20)).unwrap();

        let body = transport.requests()[1].body.clone().unwrap();
        assert_eq!(body["amount"], 2.0);
        assert_eq!(body["price"], 0.0);
        assert_eq!(body["best_before_date"], "2024-02-20");
        assert!(body.get("shopping_location_id").is_none());
    }

    #[test]
    fn test_add_purchase_missing_details_is_not_found() {
        let transport = FakeTransport::new().fail_get("/stock/products/7");
        let (client, logs) = logged_client_with(&transport);

        let err = client.add_purchase_on(&eggs(), date(2024, 2, 20)).unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
        assert_eq!(transport.calls(), vec!["GET /stock/products/7"]);
        assert_eq!(logs.error_count(), 1);
    }

    #[test]
    fn test_add_purchase_zero_factor_is_rejected_locally() {
        let transport = FakeTransport::new().on_get_json("/stock/products/7", details(json!(0)));
        let client = client_with(&transport);

        let err = client.add_purchase_on(&eggs(), date(2024, 2, 20)).unwrap_err();
        assert_eq!(
            err,
            ApiError::Core(CoreError::InvalidConversionFactor {
                product_id: 7,
                factor: 0.0
            })
        );
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn test_add_purchase_rejected_by_grocy() {
        let transport = FakeTransport::new()
            .on_get_json("/stock/products/7", details(json!(1)))
            .on_post(
                "/stock/products/7/add",
                400,
                r#"{"error_message": "Amount must be positive"}"#,
            );
        let client = client_with(&transport);

        let err = client.add_purchase_on(&eggs(), date(2024, 2, 20)).unwrap_err();
        assert_eq!(err.remote_message(), Some("Amount must be positive"));
    }

    #[test]
    fn test_convert_purchase_quantities_to_stock() {
        let transport = FakeTransport::new()
            .on_get_json("/objects/quantity_unit_conversions", conversions())
            .on_get_json("/objects/quantity_unit_conversions", conversions());
        let client = client_with(&transport);

        assert_eq!(client.convert_purchase_quantities_to_stock(1, 2, 4.0), Ok(10.0));
        assert_eq!(client.convert_purchase_quantities_to_stock(1, 3, 4.0), Ok(4.0));
    }

    #[test]
    fn test_convert_purchase_quantities_table_failure_is_error() {
        let transport =
            FakeTransport::new().on_get("/objects/quantity_unit_conversions", 500, "oops");
        let (client, logs) = logged_client_with(&transport);

        assert_eq!(
            client.convert_purchase_quantities_to_stock(1, 2, 4.0),
            Err(ApiError::Status { status: 500 })
        );
        assert_eq!(logs.error_count(), 1);
    }
}

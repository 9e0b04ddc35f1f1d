//! Reference lists: categories, locations, quantity units, stores and the
//! unit conversion table. All reads; failures become an empty list.

use grocy_core::{Location, ProductGroup, QuantityUnit, QuantityUnitConversion, ShoppingLocation};
use serde::de::DeserializeOwned;

use super::GrocyClient;
use crate::error::ApiResult;
use crate::transport::Transport;

impl<T: Transport> GrocyClient<T> {
    /// `GET /objects/{entity}`; a `null` body is an empty list.
    fn fetch_objects<R: DeserializeOwned>(&self, entity: &str) -> ApiResult<Vec<R>> {
        Ok(self
            .get_json::<Option<Vec<R>>>(self.endpoint(&["objects", entity]))?
            .unwrap_or_default())
    }

    pub(super) fn fetch_quantity_unit_conversions(&self) -> ApiResult<Vec<QuantityUnitConversion>> {
        self.fetch_objects("quantity_unit_conversions")
    }

    /// Product categories (Grocy calls them product groups).
    pub fn get_product_categories(&self) -> Vec<ProductGroup> {
        self.read("get_product_categories", Vec::new(), || {
            self.fetch_objects("product_groups")
        })
    }

    /// Id of the first category whose name matches, ignoring case.
    pub fn get_category_id_by_name(&self, name: &str) -> Option<i64> {
        let wanted = name.trim().to_lowercase();
        self.read("get_category_id_by_name", None, || {
            Ok(self
                .fetch_objects::<ProductGroup>("product_groups")?
                .into_iter()
                .find(|group| group.name.to_lowercase() == wanted)
                .map(|group| group.id))
        })
    }

    pub fn get_locations(&self) -> Vec<Location> {
        self.read("get_locations", Vec::new(), || self.fetch_objects("locations"))
    }

    pub fn get_quantity_units(&self) -> Vec<QuantityUnit> {
        self.read("get_quantity_units", Vec::new(), || {
            self.fetch_objects("quantity_units")
        })
    }

    /// Stores.
    pub fn get_shopping_locations(&self) -> Vec<ShoppingLocation> {
        self.read("get_shopping_locations", Vec::new(), || {
            self.fetch_objects("shopping_locations")
        })
    }

    /// The unit conversion table, in server order.
    pub fn get_quantity_unit_conversions(&self) -> Vec<QuantityUnitConversion> {
        self.read("get_quantity_unit_conversions", Vec::new(), || {
            self.fetch_quantity_unit_conversions()
        })
    }
}

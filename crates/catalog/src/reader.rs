//! Read-only data access for request handlers.
//!
//! Recommendation code never touches `CatalogIndex` fields directly; it goes
//! through `CatalogReader`, so tests can hand it any in-memory fixture and
//! other backends can be plugged in without touching the scorer.

use crate::types::*;
use serde::{Deserialize, Serialize};

/// Filter over the product table.
///
/// All set fields must match. `min_price`/`max_price` are inclusive; a
/// product without a price never matches a price bound.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductQuery {
    pub category: Option<CategoryId>,
    pub brand: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl ProductQuery {
    /// Query matching every product
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = self.category
            && product.category != Some(category)
        {
            return false;
        }
        if let Some(brand) = &self.brand
            && product.brand.as_deref() != Some(brand.as_str())
        {
            return false;
        }
        if self.min_price.is_none() && self.max_price.is_none() {
            return true;
        }
        let Some(price) = product.price else {
            return false;
        };
        self.min_price.is_none_or(|min| price >= min) && self.max_price.is_none_or(|max| price <= max)
    }
}

/// Read-only access to catalog records.
///
/// `Send + Sync` so one reader can be shared across request tasks.
pub trait CatalogReader: Send + Sync {
    fn product(&self, id: ProductId) -> Option<&Product>;

    /// Products matching `query`, in catalog order
    fn products(&self, query: &ProductQuery) -> Vec<&Product>;

    fn category(&self, id: CategoryId) -> Option<&Category>;

    fn user_exists(&self, id: UserId) -> bool;

    /// The user's cart lines, in cart order
    fn cart(&self, user_id: UserId) -> &[CartItem];

    /// The user's orders, in placement order
    fn orders_for_user(&self, user_id: UserId) -> Vec<&Order>;

    /// Every order in the store, in placement order
    fn all_orders(&self) -> &[Order];

    /// The user's logged interactions, in log order
    fn interactions_for_user(&self, user_id: UserId) -> &[Interaction];

    fn all_product_ids(&self) -> &[ProductId];
}

impl CatalogReader for CatalogIndex {
    fn product(&self, id: ProductId) -> Option<&Product> {
        self.get_product(id)
    }

    fn products(&self, query: &ProductQuery) -> Vec<&Product> {
        // Narrow through a secondary index when the query allows it
        let ids: &[ProductId] = match (&query.category, &query.brand) {
            (Some(category), _) => self.get_products_by_category(*category),
            (None, Some(brand)) => self.get_products_by_brand(brand),
            (None, None) => self.get_all_product_ids(),
        };
        ids.iter()
            .filter_map(|id| self.get_product(*id))
            .filter(|product| query.matches(product))
            .collect()
    }

    fn category(&self, id: CategoryId) -> Option<&Category> {
        self.get_category(id)
    }

    fn user_exists(&self, id: UserId) -> bool {
        self.get_user(id).is_some()
    }

    fn cart(&self, user_id: UserId) -> &[CartItem] {
        self.get_cart(user_id)
    }

    fn orders_for_user(&self, user_id: UserId) -> Vec<&Order> {
        self.get_user_orders(user_id)
    }

    fn all_orders(&self) -> &[Order] {
        self.get_orders()
    }

    fn interactions_for_user(&self, user_id: UserId) -> &[Interaction] {
        self.get_user_interactions(user_id)
    }

    fn all_product_ids(&self) -> &[ProductId] {
        self.get_all_product_ids()
    }
}

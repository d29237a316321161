//! Filter to drop products that cannot be bought right now.

use crate::traits::Filter;
use anyhow::Result;
use catalog::Product;
use sources::AnchorSet;

/// Removes candidates with zero units in stock.
pub struct InStockFilter;

impl Filter for InStockFilter {
    fn name(&self) -> &str {
        "InStockFilter"
    }

    fn apply(&self, candidates: Vec<Product>, _anchors: &AnchorSet) -> Result<Vec<Product>> {
        Ok(candidates.into_iter().filter(Product::in_stock).collect())
    }
}

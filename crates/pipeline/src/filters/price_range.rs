//! Filter to keep candidates inside a caller-chosen price window.

use crate::traits::Filter;
use anyhow::{Result, bail};
use catalog::Product;
use sources::AnchorSet;

/// Keeps candidates whose price lies in `[min, max]` (either bound optional).
///
/// Products without a price are kept: a missing price only zeroes the
/// price signal during scoring, it doesn't disqualify the product.
pub struct PriceRangeFilter {
    min: Option<f64>,
    max: Option<f64>,
}

impl PriceRangeFilter {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }
}

impl Filter for PriceRangeFilter {
    fn name(&self) -> &str {
        "PriceRangeFilter"
    }

    fn apply(&self, candidates: Vec<Product>, _anchors: &AnchorSet) -> Result<Vec<Product>> {
        if let (Some(min), Some(max)) = (self.min, self.max)
            && min > max
        {
            bail!("Invalid price range: min {} is above max {}", min, max);
        }

        let filtered = candidates
            .into_iter()
            .filter(|candidate| match candidate.price {
                Some(price) => {
                    self.min.is_none_or(|min| price >= min) && self.max.is_none_or(|max| price <= max)
                }
                None => true,
            })
            .collect();
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(id: u32, price: Option<f64>) -> Product {
        let mut product = Product::new(id, format!("Product {}", id));
        product.price = price;
        product
    }

    #[test]
    fn test_price_range_filter() {
        let candidates = vec![
            priced(1, Some(5.0)),
            priced(2, Some(10.0)),
            priced(3, Some(20.0)),
            priced(4, Some(20.01)),
            priced(5, None),
        ];

        let filter = PriceRangeFilter::new(Some(10.0), Some(20.0));
        let filtered = filter.apply(candidates, &AnchorSet::new()).unwrap();

        let ids: Vec<u32> = filtered.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3, 5]);
    }

    #[test]
    fn test_open_ended_range() {
        let filter = PriceRangeFilter::new(None, Some(10.0));
        let filtered = filter
            .apply(vec![priced(1, Some(5.0)), priced(2, Some(50.0))], &AnchorSet::new())
            .unwrap();
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn test_inverted_range_is_error() {
        let filter = PriceRangeFilter::new(Some(30.0), Some(10.0));
        assert!(filter.apply(vec![], &AnchorSet::new()).is_err());
    }
}

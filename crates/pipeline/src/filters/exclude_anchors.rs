//! Filter to remove products the user already has.
//!
//! This is always the first filter in the pipeline: an item in the cart or
//! the order history is never a recommendation.

use crate::traits::Filter;
use anyhow::Result;
use catalog::Product;
use sources::AnchorSet;

/// Removes candidates whose id is in the anchor set.
///
/// Uses the anchor id HashSet for O(1) lookups.
pub struct ExcludeAnchorsFilter;

impl Filter for ExcludeAnchorsFilter {
    fn name(&self) -> &str {
        "ExcludeAnchorsFilter"
    }

    fn apply(&self, candidates: Vec<Product>, anchors: &AnchorSet) -> Result<Vec<Product>> {
        let filtered: Vec<Product> = candidates
            .into_iter()
            .filter(|candidate| !anchors.contains(candidate.id))
            .collect();
        Ok(filtered)
    }
}

//! # Sources Crate
//!
//! Builds the per-request inputs of the recommendation scorer from the
//! catalog.
//!
//! ## Components
//!
//! ### Anchors
//! What the user already has: the cart, or every item from past orders.
//! Collected into an `AnchorSet` (ordered, deduplicated).
//!
//! ### Candidate Pool
//! Catalog products matching an optional category / brand / price filter,
//! with anchors removed.
//!
//! ### Co-purchase Index
//! Pair frequencies over all historical orders, used by the co-purchase
//! scoring strategy. Built once at startup and shared.
//!
//! ### Interactions
//! The products a user viewed or clicked most, counted from the optional
//! interaction log.
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{CatalogIndex, ProductQuery};
//! use sources::{build_anchor_set, AnchorSource, CandidatePool, CoPurchaseIndex};
//!
//! let index = CatalogIndex::load_from_dir("data/shop".as_ref())?;
//! let co_purchase = CoPurchaseIndex::build(index.get_orders());
//!
//! let anchors = build_anchor_set(&index, user_id, AnchorSource::Cart)?;
//! let pool = CandidatePool::build(&index, &anchors, &ProductQuery::all());
//! ```

// Public modules
pub mod anchors;
pub mod candidate_pool;
pub mod co_purchase;
pub mod interactions;
pub mod types;

// Re-export commonly used types
pub use anchors::build_anchor_set;
pub use candidate_pool::CandidatePool;
pub use co_purchase::CoPurchaseIndex;
pub use interactions::{most_interacted, DEFAULT_INTERACTION_LIMIT};
pub use types::{AnchorProfile, AnchorSet, AnchorSource, ScoredCandidate};

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::Product;

    #[test]
    fn test_anchor_set_collapses_duplicates() {
        let anchors = AnchorSet::from_products(vec![
            Product::new(3, "first"),
            Product::new(1, "second"),
            Product::new(3, "duplicate"),
        ]);

        assert_eq!(anchors.ids(), &[3, 1]);
        assert_eq!(anchors.products()[0].title, "first");
        assert_eq!(anchors.len(), 2);
    }

    #[test]
    fn test_anchor_source_parsing() {
        assert_eq!("cart".parse::<AnchorSource>().unwrap(), AnchorSource::Cart);
        assert_eq!("orders".parse::<AnchorSource>().unwrap(), AnchorSource::OrderHistory);
        assert_eq!(" Cart ".parse::<AnchorSource>().unwrap(), AnchorSource::Cart);
        assert_eq!("ORDER-HISTORY".parse::<AnchorSource>().unwrap(), AnchorSource::OrderHistory);

        let err = "wishlist".parse::<AnchorSource>().unwrap_err();
        assert!(err.to_string().contains("wishlist"));
        assert_eq!(AnchorSource::OrderHistory.to_string(), "order-history");
    }

    #[test]
    fn test_scored_candidate_creation() {
        let candidate = ScoredCandidate::new(Product::new(1, "Lamp"), 15.0);
        assert_eq!(candidate.id(), 1);
        assert_eq!(candidate.score, 15.0);
    }
}

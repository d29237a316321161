//! Filter implementations for the candidate pool.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod exclude_anchors;
pub mod in_stock;
pub mod price_range;

// Re-export for convenience
pub use exclude_anchors::ExcludeAnchorsFilter;
pub use in_stock::InStockFilter;
pub use price_range::PriceRangeFilter;

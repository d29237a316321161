//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to a candidate pool before scoring.

use anyhow::Result;
use catalog::Product;
use sources::AnchorSet;

/// Core trait for filtering the candidate pool.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be shared across request tasks
/// - Filters take ownership of the Vec<Product> and return a filtered Vec
/// - Filters must keep the relative order of what they keep; ranking ties
///   fall back to pool order
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a candidate pool.
    ///
    /// # Arguments
    /// * `candidates` - The candidates to filter (takes ownership)
    /// * `anchors` - The requesting user's anchor items
    fn apply(&self, candidates: Vec<Product>, anchors: &AnchorSet) -> Result<Vec<Product>>;
}

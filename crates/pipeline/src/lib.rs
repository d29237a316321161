//! Candidate filtering and recommendation scoring.
//!
//! This crate provides:
//! - Filter trait and implementations for narrowing the candidate pool
//! - FilterPipeline for composing filters
//! - Scoring strategies behind a single `recommend` call
//!
//! ## Architecture
//! A request flows through two stages:
//! 1. Filters remove unwanted candidates (anchors, out of stock, outside a
//!    price range)
//! 2. A scoring strategy ranks what is left against the anchors
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::filters::*;
//! use pipeline::{FilterPipeline, Recommender, ScoringConfig, Strategy};
//!
//! let pipeline = FilterPipeline::new()
//!     .add_filter(ExcludeAnchorsFilter)
//!     .add_filter(InStockFilter);
//!
//! let pool = pipeline.apply(pool.into_products(), &anchors)?;
//!
//! let recommender = Recommender::new(ScoringConfig::default());
//! let ranked = recommender.recommend(&anchors, &pool, &Strategy::AttributeWeighted);
//! ```

pub mod filter_pipeline;
pub mod filters;
pub mod scoring;
pub mod traits;

// Re-export main types
pub use filter_pipeline::FilterPipeline;
pub use scoring::{recommend, Recommender, ScoringConfig, Strategy, StrategyKind};
pub use traits::Filter;

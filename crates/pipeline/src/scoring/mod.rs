//! Recommendation scoring.
//!
//! Two interchangeable strategies share one output contract: a ranked,
//! deduplicated list of `ScoredCandidate`s that never contains an anchor.
//!
//! - `AttributeWeighted`: similarity to anchors on category, brand, price
//!   and rating (see [`attribute`])
//! - `CoPurchase`: how often candidates were bought with the anchors
//!   (see [`co_purchase`])
//!
//! Scoring is a pure function of its inputs; storage access happens
//! before it, in the `sources` crate.

pub mod attribute;
pub mod co_purchase;
pub mod config;

pub use config::ScoringConfig;

use anyhow::anyhow;
use catalog::Product;
use serde::{Deserialize, Serialize};
use sources::{AnchorSet, CoPurchaseIndex, ScoredCandidate};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, instrument};

/// Scoring strategy with whatever data it needs
#[derive(Debug, Clone, Copy)]
pub enum Strategy<'a> {
    AttributeWeighted,
    CoPurchase(&'a CoPurchaseIndex),
}

impl Strategy<'_> {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::AttributeWeighted => StrategyKind::Attribute,
            Strategy::CoPurchase(_) => StrategyKind::CoPurchase,
        }
    }
}

/// Strategy selector as it appears in configuration and on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    #[default]
    Attribute,
    CoPurchase,
}

impl StrategyKind {
    /// Bind to the data the strategy needs.
    pub fn with_index(self, index: &CoPurchaseIndex) -> Strategy<'_> {
        match self {
            StrategyKind::Attribute => Strategy::AttributeWeighted,
            StrategyKind::CoPurchase => Strategy::CoPurchase(index),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Attribute => write!(f, "attribute"),
            StrategyKind::CoPurchase => write!(f, "co-purchase"),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "attribute" | "attributes" => Ok(StrategyKind::Attribute),
            "co-purchase" | "copurchase" | "co_purchase" => Ok(StrategyKind::CoPurchase),
            other => Err(anyhow!("unknown strategy `{}`", other)),
        }
    }
}

/// Scorer with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct Recommender {
    config: ScoringConfig,
}

impl Recommender {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Rank `pool` for the given anchors.
    ///
    /// An empty anchor set or pool yields an empty list.
    #[instrument(skip_all, fields(anchors = anchors.len(), pool = pool.len(), strategy = %strategy.kind()))]
    pub fn recommend(
        &self,
        anchors: &AnchorSet,
        pool: &[Product],
        strategy: &Strategy,
    ) -> Vec<ScoredCandidate> {
        let results = match strategy {
            Strategy::AttributeWeighted => attribute::score_by_attributes(anchors, pool, &self.config),
            Strategy::CoPurchase(index) => {
                co_purchase::score_by_co_purchase(anchors, pool, index, &self.config)
            }
        };
        debug!("Scored {} recommendations", results.len());
        results
    }
}

/// Rank `pool` with the default weights and limits.
pub fn recommend(anchors: &AnchorSet, pool: &[Product], strategy: &Strategy) -> Vec<ScoredCandidate> {
    Recommender::default().recommend(anchors, pool, strategy)
}

//! Attribute-weighted scoring.
//!
//! Scores each candidate by how closely it resembles the user's anchor
//! items on category, brand, price and rating.
//!
//! ## Algorithm
//! 1. For each anchor, compute its price band `[price × 0.7, price × 1.3]`
//! 2. A candidate matches an anchor if it shares the category, shares the
//!    brand, or falls inside the band
//! 3. Score each matching candidate: category +10, brand +7, price within
//!    10% +5 (else within 20% +3), rating above 4 +2
//! 4. Keep the best 5 per anchor (first pool appearance breaks ties)
//! 5. Merge across anchors and duplicate pool entries by id, keeping each
//!    id's maximum, never the sum
//! 6. Sort again and keep the best 10 overall

use super::config::ScoringConfig;
use catalog::{Product, ProductId};
use sources::{AnchorSet, ScoredCandidate};
use std::collections::HashMap;
use tracing::debug;

/// Inclusive price window around an anchor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBand {
    pub low: f64,
    pub high: f64,
}

impl PriceBand {
    /// None when the anchor has no price
    pub fn around(anchor: &Product, config: &ScoringConfig) -> Option<Self> {
        anchor.price.map(|price| Self {
            low: price * config.band_low,
            high: price * config.band_high,
        })
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.low && price <= self.high
    }
}

/// Whether `candidate` is similar enough to `anchor` to be scored against it.
fn matches_anchor(anchor: &Product, band: Option<PriceBand>, candidate: &Product) -> bool {
    let same_category = anchor.category.is_some() && anchor.category == candidate.category;
    let same_brand = anchor.brand.is_some() && anchor.brand == candidate.brand;
    let in_band = match (band, candidate.price) {
        (Some(band), Some(price)) => band.contains(price),
        _ => false,
    };
    same_category || same_brand || in_band
}

/// Score of one candidate against one anchor. A missing attribute on
/// either side contributes 0 for that signal.
pub fn score_against(anchor: &Product, candidate: &Product, config: &ScoringConfig) -> f32 {
    let mut score = 0.0;

    if anchor.category.is_some() && anchor.category == candidate.category {
        score += config.category_weight;
    }
    if anchor.brand.is_some() && anchor.brand == candidate.brand {
        score += config.brand_weight;
    }
    if let (Some(reference), Some(price)) = (anchor.price, candidate.price) {
        let diff = (price - reference).abs();
        if diff <= reference * config.close_price_tolerance {
            score += config.close_price_weight;
        } else if diff <= reference * config.near_price_tolerance {
            score += config.near_price_weight;
        }
    }
    if candidate.rating > config.rating_threshold {
        score += config.rating_weight;
    }
    score
}

/// Rank `pool` by similarity to the anchors.
///
/// Pool entries that are anchors are ignored. An id listed more than once
/// in the pool is returned once, with the best score any of its entries
/// earned; equal scores keep the order in which ids first appear in the
/// pool. Returns at most `config.overall_limit` candidates.
pub fn score_by_attributes(
    anchors: &AnchorSet,
    pool: &[Product],
    config: &ScoringConfig,
) -> Vec<ScoredCandidate> {
    if anchors.is_empty() || pool.is_empty() {
        return Vec::new();
    }

    // First pool position of each id, used as its tie-break rank
    let mut first_position: HashMap<ProductId, usize> = HashMap::new();
    let eligible: Vec<(usize, &Product)> = pool
        .iter()
        .filter(|product| !anchors.contains(product.id))
        .map(|product| {
            let next = first_position.len();
            let rank = *first_position.entry(product.id).or_insert(next);
            (rank, product)
        })
        .collect();

    // Best (score, product) per id across all anchors
    let mut best: HashMap<ProductId, (f32, usize, &Product)> = HashMap::new();

    for anchor in anchors.products() {
        let band = PriceBand::around(anchor, config);

        let mut per_id: HashMap<ProductId, (f32, usize, &Product)> = HashMap::new();
        for &(rank, candidate) in &eligible {
            if !matches_anchor(anchor, band, candidate) {
                continue;
            }
            keep_best(&mut per_id, candidate, score_against(anchor, candidate, config), rank);
        }

        let mut scored: Vec<(f32, usize, &Product)> = per_id.into_values().collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
        scored.truncate(config.per_anchor_limit);

        debug!(
            "Anchor {} matched {} candidates (kept {})",
            anchor.id,
            eligible.len(),
            scored.len()
        );

        for (score, rank, candidate) in scored {
            keep_best(&mut best, candidate, score, rank);
        }
    }

    let mut merged: Vec<(f32, usize, &Product)> = best.into_values().collect();
    merged.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
    merged.truncate(config.overall_limit);

    merged
        .into_iter()
        .map(|(score, _, product)| ScoredCandidate::new(product.clone(), score))
        .collect()
}

/// Record `score` for `candidate` unless its id already holds a higher one.
fn keep_best<'a>(
    best: &mut HashMap<ProductId, (f32, usize, &'a Product)>,
    candidate: &'a Product,
    score: f32,
    rank: usize,
) {
    best.entry(candidate.id)
        .and_modify(|existing| {
            if score > existing.0 {
                *existing = (score, rank, candidate);
            }
        })
        .or_insert((score, rank, candidate));
}

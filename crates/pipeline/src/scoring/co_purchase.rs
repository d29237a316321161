//! Co-purchase scoring: "customers who bought this also bought".

use super::config::ScoringConfig;
use catalog::{Product, ProductId};
use sources::{AnchorSet, CoPurchaseIndex, ScoredCandidate};
use std::collections::HashMap;

/// Rank pool products by how often they were bought together with the
/// anchors. The score is the summed pair frequency.
///
/// Only products present in `pool` can be returned, so a caller's
/// category/brand/price filter still applies. Ties keep the order in
/// which the pair was first seen in order history.
pub fn score_by_co_purchase(
    anchors: &AnchorSet,
    pool: &[Product],
    index: &CoPurchaseIndex,
    config: &ScoringConfig,
) -> Vec<ScoredCandidate> {
    if anchors.is_empty() || pool.is_empty() || index.is_empty() {
        return Vec::new();
    }

    let mut by_id: HashMap<ProductId, &Product> = HashMap::with_capacity(pool.len());
    for product in pool {
        by_id.entry(product.id).or_insert(product);
    }

    let mut ranked: Vec<(&Product, u32)> = index
        .co_purchased_with(anchors.id_set())
        .into_iter()
        .filter_map(|(id, count)| by_id.get(&id).map(|product| (*product, count)))
        .collect();

    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(config.overall_limit);

    ranked
        .into_iter()
        .map(|(product, count)| ScoredCandidate::new(product.clone(), count as f32))
        .collect()
}

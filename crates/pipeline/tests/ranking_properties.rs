//! Property tests for `recommend` over generated anchors and pools.
//!
//! Ids are drawn from a small range so pools regularly repeat ids and
//! contain anchors.

use catalog::{Product, ProductId};
use pipeline::recommend;
use proptest::prelude::*;
use sources::{AnchorSet, CoPurchaseIndex, ScoredCandidate};
use std::collections::{HashMap, HashSet};

const BRANDS: [&str; 3] = ["Sonic", "Lumo", "Nord"];
const OVERALL_LIMIT: usize = 10;

fn arb_product() -> impl Strategy<Value = Product> {
    (
        1u32..=24,
        prop::option::of(1u32..=4),
        prop::option::of(0usize..BRANDS.len()),
        prop::option::of(1u32..=200),
        0u32..=50,
    )
        .prop_map(|(id, category, brand, price, rating)| Product {
            id,
            title: format!("Product {}", id),
            category,
            brand: brand.map(|b| BRANDS[b].to_string()),
            price: price.map(f64::from),
            rating: rating as f32 / 10.0,
            quantity: 1,
        })
}

fn arb_baskets() -> impl Strategy<Value = Vec<Vec<ProductId>>> {
    prop::collection::vec(prop::collection::vec(1u32..=24, 0..5), 0..24)
}

/// The shape every ranking must have, whatever the strategy.
fn check_ranking(anchors: &AnchorSet, results: &[ScoredCandidate]) -> Result<(), TestCaseError> {
    prop_assert!(results.len() <= OVERALL_LIMIT, "{} results", results.len());

    let mut seen = HashSet::new();
    for candidate in results {
        prop_assert!(!anchors.contains(candidate.id()), "anchor {} returned", candidate.id());
        prop_assert!(seen.insert(candidate.id()), "id {} returned twice", candidate.id());
    }

    for pair in results.windows(2) {
        prop_assert!(
            pair[0].score >= pair[1].score,
            "scores out of order: {} then {}",
            pair[0].score,
            pair[1].score
        );
    }
    Ok(())
}

/// Equal scores must appear in the order given by `rank`.
fn check_ties(results: &[ScoredCandidate], rank: &HashMap<ProductId, usize>) -> Result<(), TestCaseError> {
    for pair in results.windows(2) {
        if pair[0].score == pair[1].score {
            prop_assert!(
                rank[&pair[0].id()] < rank[&pair[1].id()],
                "tie between {} and {} out of order",
                pair[0].id(),
                pair[1].id()
            );
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn attribute_ranking_is_well_formed(
        anchors in prop::collection::vec(arb_product(), 0..4),
        pool in prop::collection::vec(arb_product(), 0..40),
    ) {
        let anchors = AnchorSet::from_products(anchors);
        let results = recommend(&anchors, &pool, &pipeline::Strategy::AttributeWeighted);

        check_ranking(&anchors, &results)?;

        let mut first_position = HashMap::new();
        for (position, product) in pool.iter().enumerate() {
            first_position.entry(product.id).or_insert(position);
        }
        check_ties(&results, &first_position)?;
    }

    #[test]
    fn co_purchase_ranking_is_well_formed(
        anchor_ids in prop::collection::vec(1u32..=24, 0..4),
        pool in prop::collection::vec(arb_product(), 0..40),
        baskets in arb_baskets(),
    ) {
        let anchors = AnchorSet::from_ids(anchor_ids);
        let index = CoPurchaseIndex::from_baskets(baskets.iter().map(|b| b.as_slice()));
        let results = recommend(&anchors, &pool, &pipeline::Strategy::CoPurchase(&index));

        check_ranking(&anchors, &results)?;

        let pool_ids: HashSet<ProductId> = pool.iter().map(|p| p.id).collect();
        for candidate in &results {
            prop_assert!(pool_ids.contains(&candidate.id()), "{} is not in the pool", candidate.id());
        }

        let first_seen: HashMap<ProductId, usize> = index
            .co_purchased_with(anchors.id_set())
            .into_iter()
            .enumerate()
            .map(|(position, (id, _))| (id, position))
            .collect();
        check_ties(&results, &first_seen)?;
    }
}

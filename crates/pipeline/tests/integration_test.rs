//! Integration tests for the pipeline.
//!
//! These tests run anchors and pools built from a catalog through the
//! filters and both scoring strategies.

use catalog::{CartItem, CatalogIndex, Order, OrderStatus, Product, ProductQuery, Role, User};
use pipeline::filters::*;
use pipeline::{recommend, FilterPipeline, Recommender, ScoringConfig, Strategy, StrategyKind};
use sources::{build_anchor_set, AnchorSource, CandidatePool, CoPurchaseIndex};

fn product(id: u32, category: u32, brand: &str, price: f64, rating: f32, quantity: u32) -> Product {
    Product {
        id,
        title: format!("Product {}", id),
        category: Some(category),
        brand: Some(brand.to_string()),
        price: Some(price),
        rating,
        quantity,
    }
}

fn create_test_index() -> CatalogIndex {
    let mut index = CatalogIndex::new();

    for id in 1..=3 {
        index.insert_user(User {
            id,
            name: format!("User {}", id),
            email: format!("user{}@example.com", id),
            role: Role::User,
        });
    }

    // Audio
    index.insert_product(product(1, 1, "Sonic", 100.0, 4.5, 10)); // anchor
    index.insert_product(product(2, 1, "Auralis", 105.0, 3.0, 5)); // 10 + 5 = 15
    index.insert_product(product(3, 2, "Sonic", 200.0, 4.8, 5)); // 7 + 2 = 9
    index.insert_product(product(4, 1, "Sonic", 98.0, 4.9, 0)); // out of stock
    // Home
    index.insert_product(product(5, 2, "Lumo", 30.0, 4.0, 8)); // no match
    index.insert_product(product(6, 2, "Lumo", 118.0, 3.5, 4)); // band only, 3

    // User 1 has the headphones in their cart
    index.insert_cart_item(CartItem {
        user_id: 1,
        product_id: 1,
        quantity: 1,
        price: 100.0,
    });

    let baskets: [(u32, u32, &[u32]); 4] = [
        (1, 1, &[1, 5]),
        (2, 2, &[1, 6]),
        (3, 2, &[6, 5]),
        (4, 3, &[1, 5]),
    ];
    for (id, user_id, items) in baskets {
        index.insert_order(Order {
            id,
            user_id,
            product_ids: items.to_vec(),
            status: OrderStatus::Delivered,
            total_price: 0.0,
        });
    }

    index.build_secondary_indices();
    index
}

#[test]
fn test_attribute_strategy_end_to_end() {
    let index = create_test_index();

    let anchors = build_anchor_set(&index, 1, AnchorSource::Cart).unwrap();
    let pool = CandidatePool::build(&index, &anchors, &ProductQuery::all());

    let ranked = recommend(&anchors, pool.products(), &Strategy::AttributeWeighted);
    let ids: Vec<u32> = ranked.iter().map(|c| c.id()).collect();

    // Product 4 is unfiltered here: 10 + 7 + 5 + 2
    assert_eq!(ids, vec![4, 2, 3, 6]);
    assert_eq!(ranked[0].score, 24.0);
    assert_eq!(ranked[1].score, 15.0);
    assert_eq!(ranked[2].score, 9.0);
    assert_eq!(ranked[3].score, 3.0);
}

#[test]
fn test_filters_then_scoring() {
    let index = create_test_index();

    let anchors = build_anchor_set(&index, 1, AnchorSource::Cart).unwrap();
    let pool = CandidatePool::build(&index, &anchors, &ProductQuery::all());

    let pipeline = FilterPipeline::new()
        .add_filter(ExcludeAnchorsFilter)
        .add_filter(InStockFilter)
        .add_filter(PriceRangeFilter::new(Some(50.0), Some(150.0)));

    let filtered = pipeline.apply(pool.into_products(), &anchors).unwrap();
    let ranked = recommend(&anchors, &filtered, &Strategy::AttributeWeighted);
    let ids: Vec<u32> = ranked.iter().map(|c| c.id()).collect();

    assert_eq!(ids, vec![2, 6]);
}

#[test]
fn test_co_purchase_strategy_end_to_end() {
    let index = create_test_index();
    let co_purchase = CoPurchaseIndex::build(index.get_orders());

    let anchors = build_anchor_set(&index, 1, AnchorSource::Cart).unwrap();
    let pool = CandidatePool::build(&index, &anchors, &ProductQuery::all());

    let strategy = StrategyKind::CoPurchase.with_index(&co_purchase);
    let ranked = recommend(&anchors, pool.products(), &strategy);
    let ids: Vec<u32> = ranked.iter().map(|c| c.id()).collect();

    // 1-5 appears in two orders, 1-6 in one
    assert_eq!(ids, vec![5, 6]);
    assert_eq!(ranked[0].score, 2.0);
    assert_eq!(ranked[1].score, 1.0);
}

#[test]
fn test_results_never_contain_anchors_or_duplicates() {
    let index = create_test_index();
    let co_purchase = CoPurchaseIndex::build(index.get_orders());
    let anchors = build_anchor_set(&index, 1, AnchorSource::Cart).unwrap();

    // Pool deliberately includes the anchor and a repeated product
    let mut pool: Vec<Product> = index
        .get_all_product_ids()
        .iter()
        .filter_map(|id| index.get_product(*id).cloned())
        .collect();
    pool.extend(pool.clone());

    let recommender = Recommender::new(ScoringConfig::default());
    for kind in [StrategyKind::Attribute, StrategyKind::CoPurchase] {
        let ranked = recommender.recommend(&anchors, &pool, &kind.with_index(&co_purchase));

        let mut ids: Vec<u32> = ranked.iter().map(|c| c.id()).collect();
        assert!(!ids.contains(&1), "{} returned an anchor", kind);

        let before = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), before, "{} returned a duplicate", kind);
    }
}

#[test]
fn test_user_without_anchors_gets_nothing() {
    let index = create_test_index();

    let anchors = build_anchor_set(&index, 3, AnchorSource::Cart).unwrap();
    let pool = CandidatePool::build(&index, &anchors, &ProductQuery::all());

    assert!(anchors.is_empty());
    assert!(recommend(&anchors, pool.products(), &Strategy::AttributeWeighted).is_empty());
}

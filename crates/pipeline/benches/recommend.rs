//! Benchmarks for recommendation scoring
//!
//! Run with: cargo bench --package pipeline
//!
//! Uses a synthetic catalog so the numbers don't depend on a dataset being
//! present.

use catalog::{Product, ProductId};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pipeline::{Recommender, ScoringConfig, Strategy};
use sources::{AnchorSet, CoPurchaseIndex};

const BRANDS: [&str; 8] = ["Sonic", "Auralis", "Lumo", "Summit", "Spindle", "Edgewise", "Brewhaus", "Nord"];

fn synthetic_products(count: u32) -> Vec<Product> {
    (1..=count)
        .map(|id| Product {
            id,
            title: format!("Product {}", id),
            category: Some(id % 12),
            brand: Some(BRANDS[(id % 8) as usize].to_string()),
            price: Some(10.0 + (id * 37 % 400) as f64),
            rating: (id % 50) as f32 / 10.0,
            quantity: id % 7,
        })
        .collect()
}

fn synthetic_baskets(products: u32, orders: u32) -> Vec<Vec<ProductId>> {
    (0..orders)
        .map(|order| {
            let size = 2 + order % 4;
            (0..size).map(|i| 1 + (order * 31 + i * 17) % products).collect()
        })
        .collect()
}

fn bench_attribute_strategy(c: &mut Criterion) {
    let products = synthetic_products(5_000);
    let anchors = AnchorSet::from_products(products.iter().take(8).cloned());
    let recommender = Recommender::new(ScoringConfig::default());

    c.bench_function("attribute_recommend_5k", |b| {
        b.iter(|| {
            let ranked = recommender.recommend(
                black_box(&anchors),
                black_box(&products),
                &Strategy::AttributeWeighted,
            );
            black_box(ranked)
        })
    });
}

fn bench_co_purchase_strategy(c: &mut Criterion) {
    let products = synthetic_products(5_000);
    let baskets = synthetic_baskets(5_000, 20_000);
    let index = CoPurchaseIndex::from_baskets(baskets.iter().map(|b| b.as_slice()));
    let anchors = AnchorSet::from_ids(1..=8);
    let recommender = Recommender::new(ScoringConfig::default());

    c.bench_function("co_purchase_recommend_5k", |b| {
        b.iter(|| {
            let ranked = recommender.recommend(
                black_box(&anchors),
                black_box(&products),
                &Strategy::CoPurchase(&index),
            );
            black_box(ranked)
        })
    });
}

fn bench_build_co_purchase_index(c: &mut Criterion) {
    let baskets = synthetic_baskets(5_000, 20_000);

    c.bench_function("build_co_purchase_index", |b| {
        b.iter(|| {
            let index = CoPurchaseIndex::from_baskets(black_box(&baskets).iter().map(|b| b.as_slice()));
            black_box(index)
        })
    });
}

criterion_group!(
    benches,
    bench_attribute_strategy,
    bench_co_purchase_strategy,
    bench_build_co_purchase_index
);
criterion_main!(benches);

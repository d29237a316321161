//! Example: Build anchors and a candidate pool for a user
//!
//! Run with: cargo run --package sources --example build_anchors
//!
//! This example shows how to:
//! 1. Load the shop dataset
//! 2. Build the user's anchors from cart and from order history
//! 3. Build the candidate pool
//! 4. Build the co-purchase index and look up what goes with the anchors

use catalog::{CatalogIndex, ProductQuery};
use sources::{build_anchor_set, AnchorSource, CandidatePool, CoPurchaseIndex};
use std::path::Path;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt().with_env_filter("info").init();

    println!("=== ShopRecs Anchor Example ===\n");

    let start = Instant::now();
    let index = CatalogIndex::load_from_dir(Path::new("data/shop"))?;
    println!("Loaded dataset in {:?}\n", start.elapsed());

    let user_id = 1;

    for source in [AnchorSource::Cart, AnchorSource::OrderHistory] {
        let anchors = build_anchor_set(&index, user_id, source)?;
        let pool = CandidatePool::build(&index, &anchors, &ProductQuery::all());

        println!("Anchors from {}: {:?}", source, anchors.ids());
        println!("  Profile: {:?}", anchors.profile(3));
        println!("  Candidate pool: {} products\n", pool.len());
    }

    let start = Instant::now();
    let co_purchase = CoPurchaseIndex::build(index.get_orders());
    println!(
        "Built co-purchase index ({} pairs) in {:?}",
        co_purchase.len(),
        start.elapsed()
    );

    let anchors = build_anchor_set(&index, user_id, AnchorSource::OrderHistory)?;
    println!("\nBought together with user {}'s orders:", user_id);
    for (product_id, count) in co_purchase.co_purchased_with(anchors.id_set()).iter().take(5) {
        if let Some(product) = index.get_product(*product_id) {
            println!("  {} - {} (x{})", product_id, product.title, count);
        }
    }

    Ok(())
}

use catalog::CatalogIndex;
use std::path::Path;
use std::time::Instant;

fn main() {
    let data_dir = Path::new("data/shop");

    println!("Loading shop catalog...\n");

    let start = Instant::now();
    let index = CatalogIndex::load_from_dir(data_dir)
        .expect("Failed to load catalog");
    let elapsed = start.elapsed();

    let (users, products, orders, cart_lines) = index.counts();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Users: {}", users);
    println!("Products: {}", products);
    println!("Orders: {}", orders);
    println!("Cart lines: {}", cart_lines);
    println!("\nPerformance: {:.0} orders/second",
             orders as f64 / elapsed.as_secs_f64());
}

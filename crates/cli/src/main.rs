use anyhow::{anyhow, bail, Context, Result};
use catalog::{CatalogIndex, CategoryId, OrderStatus, ProductId, ProductQuery, UserId};
use clap::{Parser, Subcommand};
use colored::Colorize;
use pipeline::StrategyKind;
use rand::Rng;
use server::{RecommendationResponse, RecommendationService, ServiceConfig};
use sources::{build_anchor_set, most_interacted, AnchorSource, DEFAULT_INTERACTION_LIMIT};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// ShopRecs - Product Recommendation Engine
#[derive(Parser)]
#[command(name = "shop-recs")]
#[command(about = "Product recommendations from carts and order history", long_about = None)]
struct Cli {
    /// Path to the shop data directory
    #[arg(short, long, default_value = "data/shop")]
    data_dir: PathBuf,

    /// Optional JSON service configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get product recommendations for a user
    Recommend {
        /// User ID to get recommendations for
        #[arg(long)]
        user_id: UserId,

        /// Anchor source: cart or orders
        #[arg(long)]
        source: Option<AnchorSource>,

        /// Scoring strategy: attribute or co-purchase
        #[arg(long)]
        strategy: Option<StrategyKind>,

        /// Only recommend products in this category
        #[arg(long)]
        category: Option<CategoryId>,

        /// Only recommend products of this brand
        #[arg(long)]
        brand: Option<String>,

        #[arg(long)]
        min_price: Option<f64>,

        #[arg(long)]
        max_price: Option<f64>,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// Show a user's cart, orders, most interacted products and anchor summary
    User {
        /// User ID to display
        #[arg(long)]
        user_id: UserId,
    },

    /// Search for products by title
    Search {
        /// Title to search for (case-insensitive substring match)
        #[arg(long)]
        title: String,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Scoring strategy to benchmark
        #[arg(long)]
        strategy: Option<StrategyKind>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = ServiceConfig::load(cli.config.as_deref())?;

    println!("Loading shop data from {}...", cli.data_dir.display());
    let start = Instant::now();
    let index = Arc::new(
        CatalogIndex::load_from_dir(&cli.data_dir).context("Failed to load shop data")?,
    );
    let (users, products, orders, cart_lines) = index.counts();
    println!(
        "{} Loaded {} users, {} products, {} orders, {} cart lines in {:?}",
        "✓".green(),
        users,
        products,
        orders,
        cart_lines,
        start.elapsed()
    );

    match cli.command {
        Commands::Recommend {
            user_id,
            source,
            strategy,
            category,
            brand,
            min_price,
            max_price,
            json,
        } => {
            let query = ProductQuery {
                category,
                brand,
                min_price,
                max_price,
            };
            let service = RecommendationService::new(index, config);
            handle_recommend(&service, user_id, source, strategy, &query, json)?
        }
        Commands::User { user_id } => handle_user(&index, user_id)?,
        Commands::Search { title } => handle_search(&index, &title)?,
        Commands::Benchmark { requests, strategy } => {
            let user_ids = index.get_all_user_ids();
            let service = RecommendationService::new(index, config);
            handle_benchmark(service, user_ids, requests, strategy).await?
        }
    }

    Ok(())
}

/// Handle the 'recommend' command
fn handle_recommend(
    service: &RecommendationService,
    user_id: UserId,
    source: Option<AnchorSource>,
    strategy: Option<StrategyKind>,
    query: &ProductQuery,
    json: bool,
) -> Result<()> {
    let response = service.recommend_for_user(user_id, source, strategy, query)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_recommendations(&response);
    }
    Ok(())
}

/// Handle the 'user' command
fn handle_user(index: &CatalogIndex, user_id: UserId) -> Result<()> {
    let user = index
        .get_user(user_id)
        .ok_or_else(|| anyhow!("User {} not found", user_id))?;

    println!("{}", format!("User ID: {}", user_id).bold().blue());
    println!("{}Name: {}", "• ".green(), user.name);
    println!("{}Email: {}", "• ".green(), user.email);
    println!("{}Role: {:?}", "• ".green(), user.role);

    let cart = index.get_cart(user_id);
    println!("Cart ({} lines):", cart.len());
    for item in cart {
        let title = index
            .get_product(item.product_id)
            .map(|p| p.title.as_str())
            .unwrap_or("<unknown product>");
        println!("  - {} x{} @ {:.2}", title, item.quantity, item.price);
    }

    let orders = index.get_user_orders(user_id);
    let spent: f64 = orders
        .iter()
        .filter(|o| o.status != OrderStatus::Cancelled)
        .map(|o| o.total_price)
        .sum();
    println!("Orders ({}, {:.2} spent):", orders.len(), spent);
    for order in &orders {
        let titles: Vec<&str> = order
            .product_ids
            .iter()
            .filter_map(|id| index.get_product(*id))
            .map(|p| p.title.as_str())
            .collect();
        println!("  - #{} [{:?}] {}", order.id, order.status, titles.join(", "));
    }

    let interacted = most_interacted(index, user_id, DEFAULT_INTERACTION_LIMIT);
    println!("Most interacted ({}):", interacted.len());
    for (product_id, count) in interacted {
        let title = index
            .get_product(product_id)
            .map(|p| p.title.as_str())
            .unwrap_or("<unknown product>");
        println!("  - {} ({} interactions)", title, count);
    }

    for source in [AnchorSource::Cart, AnchorSource::OrderHistory] {
        let anchors = build_anchor_set(index, user_id, source)?;
        let profile = anchors.profile(3);

        let categories: Vec<String> = profile
            .top_categories
            .iter()
            .map(|(id, count)| {
                let title = index
                    .get_category(*id)
                    .map(|c| c.title.clone())
                    .unwrap_or_else(|| id.to_string());
                format!("{} ({})", title, count)
            })
            .collect();
        let brands: Vec<String> = profile
            .top_brands
            .iter()
            .map(|(brand, count)| format!("{} ({})", brand, count))
            .collect();

        println!("Anchors from {} ({} items):", source, anchors.len());
        println!("{}Top categories: {}", "• ".cyan(), categories.join(", "));
        println!("{}Top brands: {}", "• ".cyan(), brands.join(", "));
        match profile.avg_price {
            Some(avg) => println!("{}Average price: {:.2}", "• ".cyan(), avg),
            None => println!("{}Average price: n/a", "• ".cyan()),
        }
    }
    Ok(())
}

/// Handle the 'search' command
fn handle_search(index: &CatalogIndex, title: &str) -> Result<()> {
    let title_lower = title.to_lowercase();

    // (product, relevance, times ordered); relevance 0 = exact, 1 = substring
    let mut matches: Vec<(ProductId, u8, u32)> = index
        .get_all_product_ids()
        .iter()
        .filter_map(|&id| {
            let product = index.get_product(id)?;
            let product_title = product.title.to_lowercase();
            let relevance = if product_title == title_lower {
                0
            } else if product_title.contains(&title_lower) {
                1
            } else {
                return None;
            };
            let times_ordered = index
                .get_product_stats(id)
                .map(|s| s.times_ordered)
                .unwrap_or(0);
            Some((id, relevance, times_ordered))
        })
        .collect();

    // Exact matches first, then most ordered
    matches.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| b.2.cmp(&a.2)));

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if matches.is_empty() {
        println!("  No products found");
    }
    for (id, _, times_ordered) in matches.iter().take(20) {
        let Some(product) = index.get_product(*id) else {
            continue;
        };
        let category = product
            .category
            .and_then(|c| index.get_category(c))
            .map(|c| c.title.as_str())
            .unwrap_or("-");
        println!(
            "{}: {} [{} / {}] {} rating {:.1} (ordered {} times)",
            id,
            product.title,
            category,
            product.brand.as_deref().unwrap_or("-"),
            format_price(product.price),
            product.rating,
            times_ordered
        );
    }
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    service: RecommendationService,
    user_ids: Vec<UserId>,
    requests: usize,
    strategy: Option<StrategyKind>,
) -> Result<()> {
    if user_ids.is_empty() {
        bail!("No users to benchmark with");
    }
    if requests == 0 {
        bail!("--requests must be at least 1");
    }

    // Pick random users from the catalog
    let mut rng = rand::rng();
    let sample: Vec<UserId> = (0..requests)
        .map(|_| user_ids[rng.random_range(0..user_ids.len())])
        .collect();
    let query = ProductQuery::all();

    // Per-request latency, each request on its own blocking task
    let mut handles = vec![];
    for &user_id in &sample {
        let service = service.clone();
        let query = query.clone();
        let handle = tokio::task::spawn_blocking(move || {
            let start = Instant::now();
            service.recommend_for_user(user_id, None, strategy, &query)?;
            Ok::<_, anyhow::Error>(start.elapsed())
        });
        handles.push(handle);
    }
    let mut timings: Vec<Duration> = vec![];
    for handle in handles {
        timings.push(handle.await??);
    }

    // Throughput, everything through one batch call
    let start = Instant::now();
    let results = service.recommend_batch(&sample, None, strategy, &query).await;
    let wall_time = start.elapsed();
    let failures = results.iter().filter(|(_, r)| r.is_err()).count();

    let total_time: Duration = timings.iter().sum();
    let avg_latency = total_time / timings.len() as u32;
    timings.sort();
    let percentile = |p: f64| timings[((timings.len() as f64 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f64 / wall_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ({} failed)", requests, failures);
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Batch wall time: {:?}", wall_time);
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

fn format_price(price: Option<f64>) -> String {
    price
        .map(|p| format!("{:.2}", p))
        .unwrap_or_else(|| "n/a".to_string())
}

/// Helper function to format and print recommendations
fn print_recommendations(response: &RecommendationResponse) {
    println!(
        "{}",
        format!(
            "Recommendations for user {} ({} anchors, {}, {}):",
            response.user_id,
            response.anchors.len(),
            response.source,
            response.strategy
        )
        .bold()
        .blue()
    );

    if response.recommendations.is_empty() {
        println!("  Nothing to recommend");
        return;
    }

    for (i, rec) in response.recommendations.iter().enumerate() {
        println!(
            "{}. {} [{} / {}] {} - Score: {:.1}",
            (i + 1).to_string().green(),
            rec.title,
            rec.category.as_deref().unwrap_or("-"),
            rec.brand.as_deref().unwrap_or("-"),
            format_price(rec.price),
            rec.score
        );
    }
}

//! Simple test harness for the recommendation service.
//!
//! Loads a catalog, then prints recommendations for one user as JSON.
//!
//! Usage: server [DATA_DIR] [USER_ID] [CONFIG_JSON]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use catalog::{CatalogIndex, ProductQuery};
use server::{RecommendationService, ServiceConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,server=debug,sources=debug,pipeline=debug")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let data_dir = PathBuf::from(args.next().unwrap_or_else(|| "data/shop".to_string()));
    let user_id = match args.next() {
        Some(raw) => raw.parse().with_context(|| format!("Invalid user id `{}`", raw))?,
        None => 1,
    };
    let config_path = args.next().map(PathBuf::from);

    info!("Starting recommendation service test harness");

    let config = ServiceConfig::load(config_path.as_deref())?;
    let index = load_catalog(&data_dir).await?;
    let service = RecommendationService::new(index, config);

    info!("Getting recommendations for user {}", user_id);
    let response = service.recommend_for_user(user_id, None, None, &ProductQuery::all())?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn load_catalog(data_dir: &Path) -> Result<Arc<CatalogIndex>> {
    let data_dir = data_dir.to_path_buf();
    let index = tokio::task::spawn_blocking(move || CatalogIndex::load_from_dir(&data_dir))
        .await
        .context("Catalog loading task panicked")?
        .context("Failed to load catalog")?;
    Ok(Arc::new(index))
}

//! # Recommendation Service
//!
//! Request-handler glue around the scorer:
//! 1. Resolve the user's anchors (cart or order history)
//! 2. Build the candidate pool from the catalog query
//! 3. Apply pool filters (anchors, stock, price range)
//! 4. Score with the chosen strategy
//! 5. Enrich results with catalog metadata
//!
//! The co-purchase index is built once at construction and shared by all
//! requests. Everything else is per request.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, anyhow};
use serde::Serialize;
use tracing::{debug, info, instrument};

use catalog::{CatalogReader, CategoryId, ProductId, ProductQuery, UserId};
use pipeline::filters::{ExcludeAnchorsFilter, InStockFilter, PriceRangeFilter};
use pipeline::{FilterPipeline, Recommender, StrategyKind};
use sources::{AnchorSet, AnchorSource, CandidatePool, CoPurchaseIndex, ScoredCandidate, build_anchor_set};

use crate::config::ServiceConfig;
use crate::error::ServiceError;

/// One recommended product, ready to serialize
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecommendation {
    pub product_id: ProductId,
    pub title: String,
    pub category_id: Option<CategoryId>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub price: Option<f64>,
    pub rating: f32,
    pub score: f32,
}

/// Links an anchor product to the recommendation id derived from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnchorRecommendationId {
    pub product_id: ProductId,
    pub recommendation_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResponse {
    pub user_id: UserId,
    pub source: AnchorSource,
    pub strategy: StrategyKind,
    pub recommendations: Vec<ProductRecommendation>,
    pub anchors: Vec<AnchorRecommendationId>,
}

impl RecommendationResponse {
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.recommendations.iter().map(|r| r.product_id).collect()
    }
}

/// `"<user>_<product>"`
pub fn recommendation_id(user_id: UserId, product_id: ProductId) -> String {
    format!("{}_{}", user_id, product_id)
}

#[derive(Clone)]
pub struct RecommendationService {
    reader: Arc<dyn CatalogReader>,
    co_purchase: Arc<CoPurchaseIndex>,
    recommender: Arc<Recommender>,
    config: Arc<ServiceConfig>,
}

impl RecommendationService {
    pub fn new(reader: Arc<dyn CatalogReader>, config: ServiceConfig) -> Self {
        let start = Instant::now();
        let co_purchase = CoPurchaseIndex::build(reader.all_orders());
        info!(
            "Built co-purchase index: {} pairs in {:.2?}",
            co_purchase.len(),
            start.elapsed()
        );

        Self {
            reader,
            co_purchase: Arc::new(co_purchase),
            recommender: Arc::new(Recommender::new(config.scoring.clone())),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn reader(&self) -> &dyn CatalogReader {
        self.reader.as_ref()
    }

    /// Recommendations for one user.
    ///
    /// `source` and `strategy` fall back to the configured defaults. The
    /// query's category and brand narrow the candidate pool; its price range
    /// is applied as a pool filter, so unpriced products stay eligible.
    #[instrument(skip(self, query))]
    pub fn recommend_for_user(
        &self,
        user_id: UserId,
        source: Option<AnchorSource>,
        strategy: Option<StrategyKind>,
        query: &ProductQuery,
    ) -> Result<RecommendationResponse, ServiceError> {
        let start = Instant::now();
        let source = source.unwrap_or(self.config.default_source);
        let strategy = strategy.unwrap_or(self.config.default_strategy);

        if let (Some(min), Some(max)) = (query.min_price, query.max_price)
            && min > max
        {
            return Err(ServiceError::InvalidRequest(format!(
                "min_price {} is above max_price {}",
                min, max
            )));
        }

        if !self.reader.user_exists(user_id) {
            return Err(ServiceError::UserNotFound(user_id));
        }

        let anchors = build_anchor_set(self.reader.as_ref(), user_id, source)
            .context("Failed to build anchor set")?;

        let pool_query = ProductQuery {
            category: query.category,
            brand: query.brand.clone(),
            min_price: None,
            max_price: None,
        };
        let pool = CandidatePool::build(self.reader.as_ref(), &anchors, &pool_query);
        let pool_size = pool.len();

        let filtered = self
            .filter_pipeline(query)
            .apply(pool.into_products(), &anchors)
            .context("Failed to apply filters")?;
        debug!("Pool: {} built, {} after filters", pool_size, filtered.len());

        let ranked = self.recommender.recommend(
            &anchors,
            &filtered,
            &strategy.with_index(&self.co_purchase),
        );

        let response = RecommendationResponse {
            user_id,
            source,
            strategy,
            recommendations: ranked.iter().map(|c| self.enrich(c)).collect(),
            anchors: anchor_ids(user_id, &anchors),
        };

        info!(
            "User {}: {} recommendations from {} anchors ({}, {}) in {:.2?}",
            user_id,
            response.recommendations.len(),
            anchors.len(),
            source,
            strategy,
            start.elapsed()
        );
        Ok(response)
    }

    /// Run several users' requests on the blocking pool and collect the
    /// results in input order.
    pub async fn recommend_batch(
        &self,
        user_ids: &[UserId],
        source: Option<AnchorSource>,
        strategy: Option<StrategyKind>,
        query: &ProductQuery,
    ) -> Vec<(UserId, Result<RecommendationResponse, ServiceError>)> {
        let handles: Vec<_> = user_ids
            .iter()
            .map(|&user_id| {
                let service = self.clone();
                let query = query.clone();
                let handle = tokio::task::spawn_blocking(move || {
                    service.recommend_for_user(user_id, source, strategy, &query)
                });
                (user_id, handle)
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (user_id, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(ServiceError::Internal(anyhow!(
                    "Recommendation task for user {} failed: {}",
                    user_id,
                    e
                ))),
            };
            results.push((user_id, result));
        }
        results
    }

    fn filter_pipeline(&self, query: &ProductQuery) -> FilterPipeline {
        let mut pipeline = FilterPipeline::new().add_filter(ExcludeAnchorsFilter);
        if self.config.exclude_out_of_stock {
            pipeline = pipeline.add_filter(InStockFilter);
        }
        if query.min_price.is_some() || query.max_price.is_some() {
            pipeline = pipeline.add_filter(PriceRangeFilter::new(query.min_price, query.max_price));
        }
        pipeline
    }

    fn enrich(&self, candidate: &ScoredCandidate) -> ProductRecommendation {
        let product = &candidate.product;
        let category = product
            .category
            .and_then(|id| self.reader.category(id))
            .map(|category| category.title.clone());

        ProductRecommendation {
            product_id: product.id,
            title: product.title.clone(),
            category_id: product.category,
            category,
            brand: product.brand.clone(),
            price: product.price,
            rating: product.rating,
            score: candidate.score,
        }
    }
}

fn anchor_ids(user_id: UserId, anchors: &AnchorSet) -> Vec<AnchorRecommendationId> {
    anchors
        .ids()
        .iter()
        .map(|&product_id| AnchorRecommendationId {
            product_id,
            recommendation_id: recommendation_id(user_id, product_id),
        })
        .collect()
}

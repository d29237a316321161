//! Shared request-scoped types: anchors and scored candidates.

use anyhow::anyhow;
use catalog::{CategoryId, Product, ProductId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Where a user's anchor items come from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnchorSource {
    /// Current cart contents
    #[default]
    Cart,
    /// Products from the user's past orders
    OrderHistory,
}

impl fmt::Display for AnchorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorSource::Cart => write!(f, "cart"),
            AnchorSource::OrderHistory => write!(f, "order-history"),
        }
    }
}

impl FromStr for AnchorSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cart" => Ok(AnchorSource::Cart),
            "orders" | "order-history" | "order_history" => Ok(AnchorSource::OrderHistory),
            other => Err(anyhow!("unknown anchor source `{}`", other)),
        }
    }
}

/// The items a user already has.
///
/// Ids keep first-seen order and never repeat. `products` holds the
/// catalog records for the ids that resolved; an id the catalog doesn't
/// know stays in the set (so it is still excluded from results) but
/// contributes no attributes.
#[derive(Debug, Clone, Default)]
pub struct AnchorSet {
    pub user_id: Option<UserId>,
    ids: Vec<ProductId>,
    id_set: HashSet<ProductId>,
    products: Vec<Product>,
}

impl AnchorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from resolved products; duplicates collapse to the first.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        let mut set = Self::new();
        for product in products {
            set.push_product(product);
        }
        set
    }

    /// Build from bare ids, with no product attributes.
    pub fn from_ids(ids: impl IntoIterator<Item = ProductId>) -> Self {
        let mut set = Self::new();
        for id in ids {
            set.push_id(id);
        }
        set
    }

    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Add an id. Returns false if it was already present.
    pub fn push_id(&mut self, id: ProductId) -> bool {
        if self.id_set.insert(id) {
            self.ids.push(id);
            true
        } else {
            false
        }
    }

    /// Add a product. Ignored if its id is already present.
    pub fn push_product(&mut self, product: Product) -> bool {
        let added = self.push_id(product.id);
        if added {
            self.products.push(product);
        }
        added
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.id_set.contains(&id)
    }

    /// Anchor ids in first-seen order
    pub fn ids(&self) -> &[ProductId] {
        &self.ids
    }

    pub fn id_set(&self) -> &HashSet<ProductId> {
        &self.id_set
    }

    /// Anchor products with known attributes, in first-seen order
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Summarise what the anchors have in common.
    pub fn profile(&self, top_n: usize) -> AnchorProfile {
        let mut categories: HashMap<CategoryId, usize> = HashMap::new();
        let mut brands: HashMap<&str, usize> = HashMap::new();
        let mut price_total = 0.0;
        let mut priced = 0usize;

        for product in &self.products {
            if let Some(category) = product.category {
                *categories.entry(category).or_insert(0) += 1;
            }
            if let Some(brand) = &product.brand {
                *brands.entry(brand.as_str()).or_insert(0) += 1;
            }
            if let Some(price) = product.price {
                price_total += price;
                priced += 1;
            }
        }

        let mut top_categories: Vec<(CategoryId, usize)> = categories.into_iter().collect();
        top_categories.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        top_categories.truncate(top_n);

        let mut top_brands: Vec<(String, usize)> = brands
            .into_iter()
            .map(|(brand, count)| (brand.to_string(), count))
            .collect();
        top_brands.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top_brands.truncate(top_n);

        AnchorProfile {
            top_categories,
            top_brands,
            avg_price: (priced > 0).then(|| price_total / priced as f64),
        }
    }
}

/// Aggregate view of an anchor set, for display and diagnostics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnchorProfile {
    /// (category, anchor count), most frequent first
    pub top_categories: Vec<(CategoryId, usize)>,
    /// (brand, anchor count), most frequent first
    pub top_brands: Vec<(String, usize)>,
    pub avg_price: Option<f64>,
}

/// A product with the score it earned for this request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub product: Product,
    pub score: f32,
}

impl ScoredCandidate {
    pub fn new(product: Product, score: f32) -> Self {
        Self { product, score }
    }

    pub fn id(&self) -> ProductId {
        self.product.id
    }
}

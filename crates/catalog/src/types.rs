//! Core domain types for the shop catalog.
//!
//! This module defines the records read from the flat-file store and the
//! `CatalogIndex` that owns them once loaded.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user account
pub type UserId = u32;

/// Unique identifier for a product
pub type ProductId = u32;

/// Unique identifier for a category
pub type CategoryId = u32;

/// Unique identifier for an order
pub type OrderId = u32;

// =============================================================================
// Users
// =============================================================================

/// A registered shop user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

// =============================================================================
// Products and Categories
// =============================================================================

/// A product in the catalog.
///
/// `category`, `brand` and `price` are optional because flat-file rows are
/// not always complete. Scoring treats a missing attribute as "no match"
/// for that one signal instead of rejecting the product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub category: Option<CategoryId>,
    pub brand: Option<String>,
    /// Non-negative unit price
    pub price: Option<f64>,
    /// Average review rating, 0.0 to 5.0
    pub rating: f32,
    /// Units in stock
    pub quantity: u32,
}

impl Product {
    /// Minimal product with only an id and title; everything else missing.
    pub fn new(id: ProductId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            category: None,
            brand: None,
            price: None,
            rating: 0.0,
            quantity: 0,
        }
    }

    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub title: String,
    pub slug: String,
}

// =============================================================================
// Orders and Carts
// =============================================================================

/// Lifecycle state of an order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

/// A placed order. `product_ids` keeps the order the items were listed in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub product_ids: Vec<ProductId>,
    pub status: OrderStatus,
    pub total_price: f64,
}

/// One line of a user's shopping cart
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CartItem {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: f64,
}

/// A logged user-product interaction such as a view or a click
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: String,
    pub user_id: UserId,
    pub product_id: ProductId,
    /// Free-form label, `view` when the log left it empty
    pub kind: String,
    /// Milliseconds since the Unix epoch; 0 when unknown
    pub timestamp: u64,
}

// =============================================================================
// Statistics
// =============================================================================

/// Purchase statistics for a product, computed once at load time
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductStats {
    /// Number of non-cancelled orders containing the product
    pub times_ordered: u32,
    /// Number of distinct users who ordered it
    pub distinct_buyers: u32,
}

// =============================================================================
// CatalogIndex
// =============================================================================

/// In-memory store holding every catalog record plus lookup indices.
///
/// Products keep their file order in `product_order`: candidate pools are
/// built in that order and ranking ties fall back to it.
#[derive(Debug, Default)]
pub struct CatalogIndex {
    pub(crate) users: HashMap<UserId, User>,
    pub(crate) categories: HashMap<CategoryId, Category>,
    pub(crate) products: HashMap<ProductId, Product>,
    pub(crate) product_order: Vec<ProductId>,

    /// All orders in file order
    pub(crate) orders: Vec<Order>,
    /// Positions into `orders` for each user
    pub(crate) user_orders: HashMap<UserId, Vec<usize>>,
    /// Cart lines per user, in file order
    pub(crate) carts: HashMap<UserId, Vec<CartItem>>,
    /// Logged interactions per user, in file order
    pub(crate) interactions: HashMap<UserId, Vec<Interaction>>,

    // Secondary indices
    pub(crate) category_index: HashMap<CategoryId, Vec<ProductId>>,
    pub(crate) brand_index: HashMap<String, Vec<ProductId>>,

    pub(crate) product_stats: HashMap<ProductId, ProductStats>,
}

impl CatalogIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_user(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn get_category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.get(&id)
    }

    pub fn get_product(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    /// Every product id, in catalog order
    pub fn get_all_product_ids(&self) -> &[ProductId] {
        &self.product_order
    }

    /// Every user id, sorted ascending
    pub fn get_all_user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.users.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn get_orders(&self) -> &[Order] {
        &self.orders
    }

    /// Orders placed by a user, in file order
    pub fn get_user_orders(&self, user_id: UserId) -> Vec<&Order> {
        self.user_orders
            .get(&user_id)
            .map(|positions| positions.iter().map(|&i| &self.orders[i]).collect())
            .unwrap_or_default()
    }

    /// A user's cart lines. Empty if the user has no cart.
    pub fn get_cart(&self, user_id: UserId) -> &[CartItem] {
        self.carts
            .get(&user_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// A user's logged interactions. Empty if none were logged.
    pub fn get_user_interactions(&self, user_id: UserId) -> &[Interaction] {
        self.interactions
            .get(&user_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn get_products_by_category(&self, category: CategoryId) -> &[ProductId] {
        self.category_index
            .get(&category)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn get_products_by_brand(&self, brand: &str) -> &[ProductId] {
        self.brand_index
            .get(brand)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn get_product_stats(&self, id: ProductId) -> Option<&ProductStats> {
        self.product_stats.get(&id)
    }

    pub fn insert_user(&mut self, user: User) {
        self.users.insert(user.id, user);
    }

    pub fn insert_category(&mut self, category: Category) {
        self.categories.insert(category.id, category);
    }

    /// Insert a product. Re-inserting an id replaces the record but keeps
    /// its original catalog position.
    pub fn insert_product(&mut self, product: Product) {
        let id = product.id;
        if self.products.insert(id, product).is_none() {
            self.product_order.push(id);
        }
    }

    pub fn insert_order(&mut self, order: Order) {
        self.user_orders
            .entry(order.user_id)
            .or_default()
            .push(self.orders.len());
        self.orders.push(order);
    }

    pub fn insert_cart_item(&mut self, item: CartItem) {
        self.carts.entry(item.user_id).or_default().push(item);
    }

    pub fn insert_interaction(&mut self, interaction: Interaction) {
        self.interactions
            .entry(interaction.user_id)
            .or_default()
            .push(interaction);
    }

    /// (users, products, orders, cart lines)
    pub fn counts(&self) -> (usize, usize, usize, usize) {
        let cart_lines = self.carts.values().map(|v| v.len()).sum();
        (
            self.users.len(),
            self.products.len(),
            self.orders.len(),
            cart_lines,
        )
    }
}

//! # Catalog Crate
//!
//! Loads and indexes the shop's flat-file data (users, categories,
//! products, orders, carts) and exposes it through the read-only
//! `CatalogReader` trait.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Product, Category, Order, CartItem, CatalogIndex)
//! - **parser**: Parse the CSV files into Rust structs
//! - **index**: Build lookup indices and purchase statistics
//! - **reader**: `CatalogReader` trait and `ProductQuery` filters
//! - **error**: Error types for catalog loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{CatalogIndex, CatalogReader, ProductQuery};
//! use std::path::Path;
//!
//! let index = CatalogIndex::load_from_dir(Path::new("data/shop"))?;
//!
//! let cart = index.cart(1);
//! let audio = index.products(&ProductQuery::all().with_category(3));
//! println!("User 1 has {} cart lines; {} audio products", cart.len(), audio.len());
//! ```

// Public modules
pub mod error;
pub mod index;
pub mod parser;
pub mod reader;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result};
pub use reader::{CatalogReader, ProductQuery};
pub use types::{
    // Type aliases
    CategoryId,
    OrderId,
    ProductId,
    UserId,
    // Core types
    CartItem,
    CatalogIndex,
    Category,
    Interaction,
    Order,
    Product,
    ProductStats,
    User,
    // Enums
    OrderStatus,
    Role,
};

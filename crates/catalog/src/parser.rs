//! Parser for the flat-file catalog.
//!
//! Each file is comma-separated with a fixed header line:
//! - users.csv: id,name,email,role
//! - categories.csv: id,title,slug
//! - products.csv: id,title,category,brand,price,quantity,rating
//! - orders.csv: id,user_id,product_ids,status,total_price
//!   (product_ids is `|`-separated)
//! - carts.csv: user_id,product_id,quantity,price
//! - interactions.csv: id,user_id,product_id,interaction_type,timestamp
//!
//! Records are read with the `csv` crate, so quoted fields may carry
//! commas, `""` escapes and line breaks, and a leading UTF-8 BOM is
//! accepted. Text inside quotes is kept verbatim; numeric and enum fields
//! are trimmed before parsing. Ids and quantities are required.
//! Category, brand, price and rating on a product are optional: a bad or
//! empty value is logged and dropped so the product still loads.

use crate::error::{CatalogError, Result};
use crate::types::*;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

pub const USERS_HEADER: &str = "id,name,email,role";
pub const CATEGORIES_HEADER: &str = "id,title,slug";
pub const PRODUCTS_HEADER: &str = "id,title,category,brand,price,quantity,rating";
pub const ORDERS_HEADER: &str = "id,user_id,product_ids,status,total_price";
pub const CARTS_HEADER: &str = "user_id,product_id,quantity,price";
pub const INTERACTIONS_HEADER: &str = "id,user_id,product_id,interaction_type,timestamp";

/// Read a CSV file and return its data records with the line each starts on.
///
/// The header must name exactly the columns in `header`. Blank lines are
/// skipped; records with the wrong field count are an error.
fn read_rows(path: &Path, header: &str) -> Result<Vec<(usize, StringRecord)>> {
    let file = file_name(path);
    if !path.exists() {
        return Err(CatalogError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::Headers)
        .flexible(true)
        .from_reader(File::open(path)?);

    let expected: Vec<&str> = header.split(',').collect();
    let found = reader.headers().map_err(|e| csv_error(&file, e))?;
    let header_matches = found.len() == expected.len()
        && found
            .iter()
            .zip(&expected)
            .all(|(got, want)| got.trim_start_matches('\u{feff}') == *want);
    if !header_matches {
        return Err(CatalogError::MissingHeader {
            file,
            expected: header.to_string(),
        });
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(&file, e))?;
        let line_no = record.position().map(|p| p.line() as usize).unwrap_or(0);
        if record.len() != expected.len() {
            return Err(CatalogError::FieldCountMismatch {
                file,
                expected: expected.len(),
                found: record.len(),
                line: line_no,
            });
        }
        rows.push((line_no, record));
    }
    Ok(rows)
}

fn csv_error(file: &str, err: csv::Error) -> CatalogError {
    CatalogError::ParseError {
        file: file.to_string(),
        line: err.position().map(|p| p.line() as usize).unwrap_or(0),
        reason: err.to_string(),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse a required field or fail with file/line context.
fn required<T>(value: &str, name: &str, file: &str, line: usize) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| CatalogError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Invalid {}: {}", name, e),
    })
}

/// Parse an optional field. Empty means absent; garbage is logged and
/// treated as absent.
fn optional<T: FromStr>(value: &str, name: &str, file: &str, line: usize) -> Option<T> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match value.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("{}:{}: ignoring invalid {} `{}`", file, line, name, value);
            None
        }
    }
}

fn parse_role(s: &str) -> Result<Role> {
    match s.trim().to_ascii_lowercase().as_str() {
        "user" | "" => Ok(Role::User),
        "admin" => Ok(Role::Admin),
        _ => Err(CatalogError::InvalidValue {
            field: "role".to_string(),
            value: s.to_string(),
        }),
    }
}

fn parse_status(s: &str) -> Result<OrderStatus> {
    match s.trim() {
        "" | "Pending" => Ok(OrderStatus::Pending),
        "Processing" => Ok(OrderStatus::Processing),
        "Shipped" => Ok(OrderStatus::Shipped),
        "Delivered" => Ok(OrderStatus::Delivered),
        "Cancelled" => Ok(OrderStatus::Cancelled),
        _ => Err(CatalogError::InvalidValue {
            field: "status".to_string(),
            value: s.to_string(),
        }),
    }
}

pub fn parse_users(path: &Path) -> Result<Vec<User>> {
    const FILE: &str = "users.csv";
    let rows = read_rows(path, USERS_HEADER)?;
    let mut users = Vec::with_capacity(rows.len());

    for (line_no, f) in rows {
        users.push(User {
            id: required(&f[0], "id", FILE, line_no)?,
            name: f[1].to_string(),
            email: f[2].trim().to_string(),
            role: parse_role(&f[3])?,
        });
    }
    Ok(users)
}

pub fn parse_categories(path: &Path) -> Result<Vec<Category>> {
    const FILE: &str = "categories.csv";
    let rows = read_rows(path, CATEGORIES_HEADER)?;
    let mut categories = Vec::with_capacity(rows.len());

    for (line_no, f) in rows {
        let title = f[1].to_string();
        let slug = match f[2].trim() {
            "" => slugify(&title),
            slug => slug.to_string(),
        };
        categories.push(Category {
            id: required(&f[0], "id", FILE, line_no)?,
            title,
            slug,
        });
    }
    Ok(categories)
}

/// Parse the products file.
///
/// A negative price is kept as missing; ratings are clamped to 0..=5.
pub fn parse_products(path: &Path) -> Result<Vec<Product>> {
    const FILE: &str = "products.csv";
    let rows = read_rows(path, PRODUCTS_HEADER)?;
    let mut products = Vec::with_capacity(rows.len());

    for (line_no, f) in rows {
        let price = optional::<f64>(&f[4], "price", FILE, line_no).filter(|p| {
            let valid = p.is_finite() && *p >= 0.0;
            if !valid {
                warn!("{}:{}: ignoring out-of-range price {}", FILE, line_no, p);
            }
            valid
        });
        let rating = optional::<f32>(&f[6], "rating", FILE, line_no)
            .filter(|r| r.is_finite())
            .map(|r| r.clamp(0.0, 5.0))
            .unwrap_or(0.0);
        let brand = Some(f[3].trim().to_string()).filter(|b| !b.is_empty());

        products.push(Product {
            id: required(&f[0], "id", FILE, line_no)?,
            title: f[1].to_string(),
            category: optional(&f[2], "category", FILE, line_no),
            brand,
            price,
            rating,
            quantity: required(&f[5], "quantity", FILE, line_no)?,
        });
    }
    Ok(products)
}

pub fn parse_orders(path: &Path) -> Result<Vec<Order>> {
    const FILE: &str = "orders.csv";
    let rows = read_rows(path, ORDERS_HEADER)?;
    let mut orders = Vec::with_capacity(rows.len());

    for (line_no, f) in rows {
        let product_ids = f[2]
            .split('|')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| required(s, "product id", FILE, line_no))
            .collect::<Result<Vec<ProductId>>>()?;

        orders.push(Order {
            id: required(&f[0], "id", FILE, line_no)?,
            user_id: required(&f[1], "user_id", FILE, line_no)?,
            product_ids,
            status: parse_status(&f[3])?,
            total_price: optional(&f[4], "total_price", FILE, line_no).unwrap_or(0.0),
        });
    }
    Ok(orders)
}

pub fn parse_carts(path: &Path) -> Result<Vec<CartItem>> {
    const FILE: &str = "carts.csv";
    let rows = read_rows(path, CARTS_HEADER)?;
    let mut items = Vec::with_capacity(rows.len());

    for (line_no, f) in rows {
        items.push(CartItem {
            user_id: required(&f[0], "user_id", FILE, line_no)?,
            product_id: required(&f[1], "product_id", FILE, line_no)?,
            quantity: optional(&f[2], "quantity", FILE, line_no).unwrap_or(1),
            price: optional(&f[3], "price", FILE, line_no).unwrap_or(0.0),
        });
    }
    Ok(items)
}

/// Parse the interaction log. An empty type reads as `view`.
pub fn parse_interactions(path: &Path) -> Result<Vec<Interaction>> {
    const FILE: &str = "interactions.csv";
    let rows = read_rows(path, INTERACTIONS_HEADER)?;
    let mut interactions = Vec::with_capacity(rows.len());

    for (line_no, f) in rows {
        let kind = match f[3].trim() {
            "" => "view".to_string(),
            kind => kind.to_ascii_lowercase(),
        };
        interactions.push(Interaction {
            id: f[0].trim().to_string(),
            user_id: required(&f[1], "user_id", FILE, line_no)?,
            product_id: required(&f[2], "product_id", FILE, line_no)?,
            kind,
            timestamp: optional(&f[4], "timestamp", FILE, line_no).unwrap_or(0),
        });
    }
    Ok(interactions)
}

/// Lowercase, hyphen-separated slug for a title.
///
/// Example: "Home & Garden" -> "home-garden"
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

//! CatalogIndex building and indexing logic.
//!
//! Builds the in-memory catalog from a data directory:
//! - primary records (users, categories, products, orders, carts)
//! - secondary indices (products by category, products by brand)
//! - purchase statistics per product
//! - referential integrity checks

use crate::error::{CatalogError, Result};
use crate::parser;
use crate::types::*;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

impl CatalogIndex {
    /// Load the whole catalog from a directory of CSV files.
    ///
    /// `interactions.csv` is optional; the other five files are required.
    ///
    /// Steps:
    /// 1. Parse all files in parallel
    /// 2. Insert primary records
    /// 3. Build secondary indices
    /// 4. Compute product statistics
    /// 5. Validate references
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        info!("Loading shop catalog from {:?}", data_dir);

        let users_path = data_dir.join("users.csv");
        let categories_path = data_dir.join("categories.csv");
        let products_path = data_dir.join("products.csv");
        let orders_path = data_dir.join("orders.csv");
        let carts_path = data_dir.join("carts.csv");
        let interactions_path = data_dir.join("interactions.csv");

        let ((users, categories), (products, (orders, (carts, interactions)))) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_users(&users_path),
                    || parser::parse_categories(&categories_path),
                )
            },
            || {
                rayon::join(
                    || parser::parse_products(&products_path),
                    || {
                        rayon::join(
                            || parser::parse_orders(&orders_path),
                            || {
                                rayon::join(
                                    || parser::parse_carts(&carts_path),
                                    || load_interactions(&interactions_path),
                                )
                            },
                        )
                    },
                )
            },
        );

        let users = users?;
        let categories = categories?;
        let products = products?;
        let orders = orders?;
        let carts = carts?;
        let interactions = interactions?;

        info!(
            "Parsed {} users, {} categories, {} products, {} orders, {} cart lines, {} interactions",
            users.len(),
            categories.len(),
            products.len(),
            orders.len(),
            carts.len(),
            interactions.len()
        );

        let mut index = CatalogIndex::new();
        for user in users {
            index.insert_user(user);
        }
        for category in categories {
            index.insert_category(category);
        }
        for product in products {
            index.insert_product(product);
        }
        for order in orders {
            index.insert_order(order);
        }
        for item in carts {
            index.insert_cart_item(item);
        }
        for interaction in interactions {
            index.insert_interaction(interaction);
        }

        index.build_secondary_indices();
        index.compute_product_stats();
        index.validate()?;

        info!("Catalog loaded and validated");
        Ok(index)
    }

    /// Rebuild the category and brand indices from the product table.
    ///
    /// Index entries follow catalog order.
    pub fn build_secondary_indices(&mut self) {
        self.category_index.clear();
        self.brand_index.clear();

        for id in &self.product_order {
            let Some(product) = self.products.get(id) else {
                continue;
            };
            if let Some(category) = product.category {
                self.category_index.entry(category).or_default().push(*id);
            }
            if let Some(brand) = &product.brand {
                self.brand_index.entry(brand.clone()).or_default().push(*id);
            }
        }
        debug!(
            "Indexed {} categories and {} brands",
            self.category_index.len(),
            self.brand_index.len()
        );
    }

    /// Compute purchase statistics for every ordered product.
    ///
    /// Cancelled orders do not count. A product listed twice in one order
    /// counts once for that order.
    pub fn compute_product_stats(&mut self) {
        let per_product: HashMap<ProductId, (u32, HashSet<UserId>)> = self
            .orders
            .par_iter()
            .filter(|order| order.status != OrderStatus::Cancelled)
            .fold(HashMap::new, |mut local: HashMap<ProductId, (u32, HashSet<UserId>)>, order| {
                let unique: HashSet<ProductId> = order.product_ids.iter().copied().collect();
                for product_id in unique {
                    let entry = local.entry(product_id).or_default();
                    entry.0 += 1;
                    entry.1.insert(order.user_id);
                }
                local
            })
            .reduce(HashMap::new, |mut acc, local| {
                for (product_id, (count, buyers)) in local {
                    let entry = acc.entry(product_id).or_default();
                    entry.0 += count;
                    entry.1.extend(buyers);
                }
                acc
            });

        self.product_stats = per_product
            .into_iter()
            .map(|(product_id, (times_ordered, buyers))| {
                (
                    product_id,
                    ProductStats {
                        times_ordered,
                        distinct_buyers: buyers.len() as u32,
                    },
                )
            })
            .collect();
    }

    /// Validate referential integrity.
    ///
    /// Checks that:
    /// - every order and cart line belongs to a known user
    /// - every ordered or carted product exists
    /// - every product category, when present, exists
    pub fn validate(&self) -> Result<()> {
        for order in &self.orders {
            if !self.users.contains_key(&order.user_id) {
                return Err(CatalogError::MissingReference {
                    entity: "User".to_string(),
                    id: order.user_id,
                });
            }
            for product_id in &order.product_ids {
                if !self.products.contains_key(product_id) {
                    return Err(CatalogError::MissingReference {
                        entity: "Product".to_string(),
                        id: *product_id,
                    });
                }
            }
        }

        for item in self.carts.values().flatten() {
            if !self.users.contains_key(&item.user_id) {
                return Err(CatalogError::MissingReference {
                    entity: "User".to_string(),
                    id: item.user_id,
                });
            }
            if !self.products.contains_key(&item.product_id) {
                return Err(CatalogError::MissingReference {
                    entity: "Product".to_string(),
                    id: item.product_id,
                });
            }
            if item.quantity == 0 {
                return Err(CatalogError::ValidationError(format!(
                    "cart line for user {} product {} has zero quantity",
                    item.user_id, item.product_id
                )));
            }
        }

        for product in self.products.values() {
            if let Some(category) = product.category
                && !self.categories.contains_key(&category)
            {
                return Err(CatalogError::MissingReference {
                    entity: "Category".to_string(),
                    id: category,
                });
            }
        }
        Ok(())
    }
}

/// The interaction log is optional: a missing file reads as empty.
fn load_interactions(path: &Path) -> Result<Vec<Interaction>> {
    if !path.exists() {
        debug!("No interaction log at {:?}", path);
        return Ok(Vec::new());
    }
    parser::parse_interactions(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_dataset(dir: &Path) {
        fs::write(
            dir.join("users.csv"),
            "id,name,email,role\n1,Ada,ada@example.com,user\n2,Bob,bob@example.com,admin\n",
        )
        .unwrap();
        fs::write(
            dir.join("categories.csv"),
            "id,title,slug\n1,Audio,audio\n2,Home,\n",
        )
        .unwrap();
        fs::write(
            dir.join("products.csv"),
            "id,title,category,brand,price,quantity,rating\n\
             1,Headphones,1,Sonic,100,5,4.5\n\
             2,Speaker,1,Sonic,120,0,4.1\n\
             3,Lamp,2,Lumo,30,8,3.9\n",
        )
        .unwrap();
        fs::write(
            dir.join("orders.csv"),
            "id,user_id,product_ids,status,total_price\n\
             1,1,1|2,Delivered,220\n\
             2,2,1|1|3,Pending,230\n\
             3,2,2,Cancelled,120\n",
        )
        .unwrap();
        fs::write(
            dir.join("carts.csv"),
            "user_id,product_id,quantity,price\n1,3,1,30\n",
        )
        .unwrap();
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(dir.path());

        let index = CatalogIndex::load_from_dir(dir.path()).unwrap();
        assert_eq!(index.counts(), (2, 3, 3, 1));
        assert_eq!(index.get_all_product_ids(), &[1, 2, 3]);
        assert_eq!(index.get_products_by_category(1), &[1, 2]);
        assert_eq!(index.get_products_by_brand("Lumo"), &[3]);
        assert_eq!(index.get_category(2).unwrap().slug, "home");
        assert_eq!(index.get_user_orders(2).len(), 2);
        // No interaction log in this dataset
        assert!(index.get_user_interactions(1).is_empty());
    }

    #[test]
    fn test_load_interaction_log() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(dir.path());
        fs::write(
            dir.path().join("interactions.csv"),
            "id,user_id,product_id,interaction_type,timestamp\n\
             a,1,3,view,1\n\
             b,2,1,click,2\n\
             c,1,1,view,3\n",
        )
        .unwrap();

        let index = CatalogIndex::load_from_dir(dir.path()).unwrap();
        let products: Vec<ProductId> = index
            .get_user_interactions(1)
            .iter()
            .map(|i| i.product_id)
            .collect();
        assert_eq!(products, vec![3, 1]);
        assert_eq!(index.get_user_interactions(2)[0].kind, "click");
    }

    #[test]
    fn test_product_stats_skip_cancelled_and_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(dir.path());
        let index = CatalogIndex::load_from_dir(dir.path()).unwrap();

        let headphones = index.get_product_stats(1).unwrap();
        assert_eq!(headphones.times_ordered, 2);
        assert_eq!(headphones.distinct_buyers, 2);

        // Only the delivered order counts for the speaker
        let speaker = index.get_product_stats(2).unwrap();
        assert_eq!(speaker.times_ordered, 1);
        assert_eq!(speaker.distinct_buyers, 1);
    }

    #[test]
    fn test_validate_missing_product() {
        let mut index = CatalogIndex::new();
        index.insert_user(User {
            id: 1,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            role: Role::User,
        });
        index.insert_order(Order {
            id: 1,
            user_id: 1,
            product_ids: vec![42],
            status: OrderStatus::Pending,
            total_price: 0.0,
        });

        match index.validate() {
            Err(CatalogError::MissingReference { entity, id }) => {
                assert_eq!(entity, "Product");
                assert_eq!(id, 42);
            }
            other => panic!("expected missing reference, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_missing_category() {
        let mut index = CatalogIndex::new();
        let mut product = Product::new(1, "Lamp");
        product.category = Some(9);
        index.insert_product(product);

        assert!(matches!(
            index.validate(),
            Err(CatalogError::MissingReference { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = CatalogIndex::load_from_dir(dir.path());
        assert!(matches!(result, Err(CatalogError::FileNotFound { .. })));
    }
}

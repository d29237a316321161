//! Candidate pool construction.
//!
//! The pool is every catalog product matching a `ProductQuery`, in catalog
//! order, minus the user's anchors. Catalog order matters: ranking ties
//! fall back to a candidate's position in the pool.

use crate::types::AnchorSet;
use catalog::{CatalogReader, Product, ProductQuery};
use tracing::{debug, instrument};

/// Products eligible to be recommended for one request
#[derive(Debug, Clone, Default)]
pub struct CandidatePool {
    products: Vec<Product>,
}

impl CandidatePool {
    /// Query the catalog and drop anchors.
    #[instrument(skip(reader, anchors), fields(anchors = anchors.len()))]
    pub fn build<R>(reader: &R, anchors: &AnchorSet, query: &ProductQuery) -> Self
    where
        R: CatalogReader + ?Sized,
    {
        let products: Vec<Product> = reader
            .products(query)
            .into_iter()
            .filter(|product| !anchors.contains(product.id))
            .cloned()
            .collect();

        debug!("Candidate pool holds {} products", products.len());
        Self { products }
    }

    /// Wrap an already materialised list, dropping anchors.
    pub fn from_products(products: Vec<Product>, anchors: &AnchorSet) -> Self {
        Self {
            products: products
                .into_iter()
                .filter(|product| !anchors.contains(product.id))
                .collect(),
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn into_products(self) -> Vec<Product> {
        self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{CatalogIndex, ProductId};

    fn create_test_index() -> CatalogIndex {
        let mut index = CatalogIndex::new();
        for id in [5, 1, 4, 2, 3] {
            let mut product = Product::new(id, format!("Product {}", id));
            product.category = Some(if id % 2 == 0 { 2 } else { 1 });
            product.price = Some(id as f64);
            index.insert_product(product);
        }
        index.build_secondary_indices();
        index
    }

    fn ids(pool: &CandidatePool) -> Vec<ProductId> {
        pool.products().iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_pool_excludes_anchors_and_keeps_catalog_order() {
        let index = create_test_index();
        let anchors = AnchorSet::from_ids([4, 3]);

        let pool = CandidatePool::build(&index, &anchors, &ProductQuery::all());
        assert_eq!(ids(&pool), vec![5, 1, 2]);
    }

    #[test]
    fn test_pool_applies_query() {
        let index = create_test_index();
        let anchors = AnchorSet::from_ids([1]);

        let pool = CandidatePool::build(&index, &anchors, &ProductQuery::all().with_category(1));
        assert_eq!(ids(&pool), vec![5, 3]);
    }

    #[test]
    fn test_from_products_drops_anchors() {
        let anchors = AnchorSet::from_ids([2]);
        let pool = CandidatePool::from_products(
            vec![Product::new(1, "a"), Product::new(2, "b")],
            &anchors,
        );
        assert_eq!(ids(&pool), vec![1]);
        assert!(!pool.is_empty());
    }
}

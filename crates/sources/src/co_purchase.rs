//! Co-purchase frequency index.
//!
//! "Customers who bought this also bought..."
//!
//! ## Algorithm
//! 1. For every order, take each unordered pair of distinct items in it
//! 2. Count how many orders contain each pair
//! 3. Remember the order in which pairs were first seen; ties in the
//!    final ranking fall back to it
//!
//! Built once from order history and shared read-only across requests.

use catalog::{Order, OrderStatus, ProductId};
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

/// Unordered pair key, stored smallest id first
type PairKey = (ProductId, ProductId);

fn pair_key(a: ProductId, b: ProductId) -> PairKey {
    if a <= b { (a, b) } else { (b, a) }
}

/// Pair frequencies over historical orders, in first-seen order
#[derive(Debug, Clone, Default)]
pub struct CoPurchaseIndex {
    pairs: Vec<(PairKey, u32)>,
    positions: HashMap<PairKey, usize>,
}

impl CoPurchaseIndex {
    /// Build from orders. Cancelled orders are skipped.
    #[instrument(skip(orders), fields(orders = orders.len()))]
    pub fn build(orders: &[Order]) -> Self {
        let index = Self::from_baskets(
            orders
                .iter()
                .filter(|order| order.status != OrderStatus::Cancelled)
                .map(|order| order.product_ids.as_slice()),
        );
        debug!("Co-purchase index holds {} pairs", index.len());
        index
    }

    /// Build from raw baskets of product ids.
    ///
    /// An item listed twice in one basket counts once for that basket.
    pub fn from_baskets<'a>(baskets: impl IntoIterator<Item = &'a [ProductId]>) -> Self {
        let mut index = Self::default();

        for basket in baskets {
            let mut seen = HashSet::new();
            let items: Vec<ProductId> = basket.iter().copied().filter(|id| seen.insert(*id)).collect();

            for (i, &a) in items.iter().enumerate() {
                for &b in &items[i + 1..] {
                    index.increment(pair_key(a, b));
                }
            }
        }
        index
    }

    fn increment(&mut self, key: PairKey) {
        match self.positions.get(&key) {
            Some(&pos) => self.pairs[pos].1 += 1,
            None => {
                self.positions.insert(key, self.pairs.len());
                self.pairs.push((key, 1));
            }
        }
    }

    /// How many orders contained both items
    pub fn frequency(&self, a: ProductId, b: ProductId) -> u32 {
        self.positions
            .get(&pair_key(a, b))
            .map(|&pos| self.pairs[pos].1)
            .unwrap_or(0)
    }

    /// Number of distinct pairs
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Total co-purchase count of every item bought alongside `owned`.
    ///
    /// Walks pairs in first-seen order. A pair with exactly one side in
    /// `owned` adds its count to the other side. Items in `owned` never
    /// appear in the output. The result lists each item once, in the order
    /// it was first encountered.
    pub fn co_purchased_with(&self, owned: &HashSet<ProductId>) -> Vec<(ProductId, u32)> {
        let mut totals: Vec<(ProductId, u32)> = Vec::new();
        let mut slot: HashMap<ProductId, usize> = HashMap::new();

        for &((a, b), count) in &self.pairs {
            let other = match (owned.contains(&a), owned.contains(&b)) {
                (true, false) => b,
                (false, true) => a,
                _ => continue,
            };
            match slot.get(&other) {
                Some(&pos) => totals[pos].1 += count,
                None => {
                    slot.insert(other, totals.len());
                    totals.push((other, count));
                }
            }
        }
        totals
    }
}

//! The products a user has interacted with most, from the interaction log.

use catalog::{CatalogReader, ProductId, UserId};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// How many products `most_interacted` lists by default
pub const DEFAULT_INTERACTION_LIMIT: usize = 5;

/// Rank the products `user_id` interacted with by interaction count.
///
/// Every interaction counts once whatever its kind. Equal counts keep the
/// order of each product's first interaction. At most `limit` entries are
/// returned; an unknown user or an empty log gives an empty list.
#[instrument(skip(reader))]
pub fn most_interacted<R>(reader: &R, user_id: UserId, limit: usize) -> Vec<(ProductId, u32)>
where
    R: CatalogReader + ?Sized,
{
    let mut counts: Vec<(ProductId, u32)> = Vec::new();
    let mut slot: HashMap<ProductId, usize> = HashMap::new();

    for interaction in reader.interactions_for_user(user_id) {
        match slot.get(&interaction.product_id) {
            Some(&pos) => counts[pos].1 += 1,
            None => {
                slot.insert(interaction.product_id, counts.len());
                counts.push((interaction.product_id, 1));
            }
        }
    }

    // Stable, so first-seen order breaks ties
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(limit);

    debug!("User {} has {} ranked interactions", user_id, counts.len());
    counts
}

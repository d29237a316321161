//! Build a user's AnchorSet from the catalog.
//!
//! Anchors are gathered once per request so scoring never goes back to
//! storage.

use crate::types::{AnchorSet, AnchorSource};
use anyhow::{Result, anyhow};
use catalog::{CatalogReader, OrderStatus, ProductId, UserId};
use tracing::{debug, instrument, warn};

/// Build the AnchorSet for `user_id` from the chosen source.
///
/// - `Cart`: cart lines in cart order
/// - `OrderHistory`: items of every non-cancelled order, order by order
///
/// Errors if the user doesn't exist. A user with an empty cart or no
/// orders gets an empty set.
#[instrument(skip(reader))]
pub fn build_anchor_set<R>(reader: &R, user_id: UserId, source: AnchorSource) -> Result<AnchorSet>
where
    R: CatalogReader + ?Sized,
{
    if !reader.user_exists(user_id) {
        return Err(anyhow!("User {} not found", user_id));
    }

    let ids: Vec<ProductId> = match source {
        AnchorSource::Cart => reader.cart(user_id).iter().map(|item| item.product_id).collect(),
        AnchorSource::OrderHistory => reader
            .orders_for_user(user_id)
            .into_iter()
            .filter(|order| order.status != OrderStatus::Cancelled)
            .flat_map(|order| order.product_ids.iter().copied())
            .collect(),
    };

    let mut anchors = AnchorSet::new().with_user(user_id);
    for id in ids {
        match reader.product(id) {
            Some(product) => {
                anchors.push_product(product.clone());
            }
            None => {
                warn!("Anchor product {} for user {} is not in the catalog", id, user_id);
                anchors.push_id(id);
            }
        }
    }

    debug!(
        "Built {} anchors ({} with attributes) for user {}",
        anchors.len(),
        anchors.products().len(),
        user_id
    );
    Ok(anchors)
}

//! Reconciliation of a remote snapshot with the local override ledgers.
//!
//! The output order is fixed: surviving remote products in remote order (with
//! updates applied in place), then locally created products in append order.
//! Created ids come from an [`IdGenerator`](crate::ids::IdGenerator) and never
//! overlap remote ids, so no deduplication happens here. Deleted ids are
//! suppressed from both sources.
//!
//! [`normalize_rating`] is applied to every product that leaves this module.

use crate::ledger::LedgerSnapshot;
use crate::model::{Product, Rating};

/// Fills a missing rating with `{ rate: 0, count: 0 }`.
pub fn normalize_rating(mut product: Product) -> Product {
    product.rating.get_or_insert_with(Rating::default);
    product
}

/// Computes the effective snapshot. Pure: same inputs, same output.
pub fn reconcile(remote: Vec<Product>, ledgers: &LedgerSnapshot) -> Vec<Product> {
    let mut effective: Vec<Product> = remote
        .into_iter()
        .filter(|p| !ledgers.deleted.contains(&p.id))
        .map(|p| match ledgers.updated.get(&p.id) {
            Some(replacement) => {
                let mut replacement = replacement.clone();
                if replacement.rating.is_none() {
                    replacement.rating = p.rating;
                }
                normalize_rating(replacement)
            }
            None => normalize_rating(p),
        })
        .collect();

    effective.extend(
        ledgers
            .created
            .iter()
            .filter(|p| !ledgers.deleted.contains(&p.id))
            .cloned()
            .map(normalize_rating),
    );
    effective
}

//! Duplicate detection over pending transactions

use crate::models::PendingTransaction;
use std::collections::HashMap;

/// The (store, amount, currency, date) key that identifies the same purchase
/// reported more than once. Storage identity is deliberately left out.
pub fn natural_key(transaction: &PendingTransaction) -> String {
    format!(
        "{}|{}|{}|{}",
        transaction.store_name, transaction.amount, transaction.currency, transaction.date
    )
}

/// Ids to remove so that every natural key keeps only its oldest record.
///
/// Groups are ordered by `created_at` with a stable sort, so among records
/// sharing a timestamp the one seen first in the input survives. The
/// returned ids are sorted ascending.
pub fn find_duplicates(transactions: &[PendingTransaction]) -> Vec<i64> {
    let mut groups: HashMap<String, Vec<&PendingTransaction>> = HashMap::new();
    for transaction in transactions {
        groups
            .entry(natural_key(transaction))
            .or_default()
            .push(transaction);
    }

    let mut to_remove: Vec<i64> = groups
        .into_values()
        .filter(|group| group.len() > 1)
        .flat_map(|mut group| {
            group.sort_by_key(|t| t.created_at);
            group.into_iter().skip(1).map(|t| t.id).collect::<Vec<_>>()
        })
        .collect();

    to_remove.sort_unstable();
    to_remove
}

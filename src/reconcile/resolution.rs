use crate::models::{MerchantMapping, PendingTransaction, ResolvedTransaction};
use std::collections::HashMap;

/// Attach mapping info to each transaction by store name.
///
/// The joined `has_mapping`/`category`/`tags` are taken from the mapping
/// table only; values written directly onto a transaction stay under its
/// `assigned` field and do not make it count as mapped.
pub fn resolve_mappings(
    transactions: Vec<PendingTransaction>,
    mappings: &[MerchantMapping],
) -> Vec<ResolvedTransaction> {
    let by_store: HashMap<&str, &MerchantMapping> = mappings
        .iter()
        .map(|m| (m.store_name.as_str(), m))
        .collect();

    transactions
        .into_iter()
        .map(|transaction| {
            let mapping = by_store.get(transaction.store_name.as_str()).copied();
            ResolvedTransaction {
                has_mapping: mapping.is_some(),
                category: mapping.map(|m| m.category.clone()),
                tags: mapping.and_then(|m| m.tags.clone()),
                transaction,
            }
        })
        .collect()
}

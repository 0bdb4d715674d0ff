//! Display buckets for the pending-transactions page

use crate::models::ResolvedTransaction;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayBucket {
    /// Unprocessed and no mapping for the store.
    ActionRequired,
    /// Unprocessed, mapped, nothing else missing.
    WaitingReady,
    /// Unprocessed, mapped, but the merchant needs a description first.
    WaitingNeedsDescription,
    History,
}

pub fn bucket_of(resolved: &ResolvedTransaction) -> DisplayBucket {
    let tx = &resolved.transaction;
    if tx.processed {
        DisplayBucket::History
    } else if !resolved.has_mapping {
        DisplayBucket::ActionRequired
    } else if tx.requires_description && !tx.has_description() {
        DisplayBucket::WaitingNeedsDescription
    } else {
        DisplayBucket::WaitingReady
    }
}

#[derive(Debug, Default, Serialize)]
pub struct WaitingBuckets {
    pub ready: Vec<ResolvedTransaction>,
    pub needs_description: Vec<ResolvedTransaction>,
}

#[derive(Debug, Default, Serialize)]
pub struct PendingSummary {
    pub action_required: Vec<ResolvedTransaction>,
    pub waiting: WaitingBuckets,
    /// Most recent first, cut to the history limit.
    pub history: Vec<ResolvedTransaction>,
    pub history_total: usize,
}

pub fn classify(resolved: Vec<ResolvedTransaction>, history_limit: usize) -> PendingSummary {
    let mut summary = PendingSummary::default();

    for transaction in resolved {
        match bucket_of(&transaction) {
            DisplayBucket::ActionRequired => summary.action_required.push(transaction),
            DisplayBucket::WaitingReady => summary.waiting.ready.push(transaction),
            DisplayBucket::WaitingNeedsDescription => {
                summary.waiting.needs_description.push(transaction)
            }
            DisplayBucket::History => summary.history.push(transaction),
        }
    }

    summary
        .history
        .sort_by(|a, b| b.transaction.created_at.cmp(&a.transaction.created_at));
    summary.history_total = summary.history.len();
    summary.history.truncate(history_limit);

    summary
}

//! Pending transaction reconciliation
//!
//! A pending transaction leaves the pending set once the explorer reports it,
//! either confirmed or in the mempool. Entries the network silently dropped
//! never show up in either list; they can be expired with
//! [`ReconcileOptions::stale_after_ms`].

use halcyon_core::{MempoolTransaction, PendingTransaction, Transaction};
use std::collections::HashSet;

/// Reconciliation options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Drop entries older than this that the explorer has never reported
    pub stale_after_ms: Option<i64>,
}

/// Pending set after reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciled {
    /// Still pending
    pub kept: Vec<PendingTransaction>,
    /// Hashes removed from the pending set
    pub dropped: Vec<String>,
}

/// Drop pending transactions seen in confirmed or mempool results
pub fn reconcile_pending(
    pending: &[PendingTransaction],
    confirmed: &[Transaction],
    mempool: &[MempoolTransaction],
) -> Reconciled {
    reconcile_pending_with(pending, confirmed, mempool, ReconcileOptions::default(), 0)
}

/// [`reconcile_pending`] with an optional expiry relative to `now_ms`
pub fn reconcile_pending_with(
    pending: &[PendingTransaction],
    confirmed: &[Transaction],
    mempool: &[MempoolTransaction],
    options: ReconcileOptions,
    now_ms: i64,
) -> Reconciled {
    let seen: HashSet<&str> = confirmed
        .iter()
        .map(|tx| tx.hash.as_str())
        .chain(mempool.iter().map(|tx| tx.hash.as_str()))
        .collect();

    let mut result = Reconciled::default();
    for tx in pending {
        let stale = options
            .stale_after_ms
            .is_some_and(|limit| now_ms.saturating_sub(tx.timestamp) > limit);
        if seen.contains(tx.hash.as_str()) {
            result.dropped.push(tx.hash.clone());
        } else if stale {
            tracing::warn!("Expiring pending transaction {} never seen by the explorer", tx.hash);
            result.dropped.push(tx.hash.clone());
        } else {
            result.kept.push(tx.clone());
        }
    }
    result
}

//! Read-only views over [`AppState`]

use crate::slices::AppState;
use halcyon_core::{Address, Transaction};

/// The default address
pub fn default_address(state: &AppState) -> Option<&Address> {
    state.addresses.entries.values().find(|a| a.is_default)
}

/// Address by hash
pub fn address_by_hash<'a>(state: &'a AppState, hash: &str) -> Option<&'a Address> {
    state.addresses.entries.get(hash)
}

/// Sum of available balances
pub fn total_balance(state: &AppState) -> u128 {
    state
        .addresses
        .entries
        .values()
        .fold(0u128, |sum, a| sum.saturating_add(a.balance))
}

/// Sum of locked balances
pub fn total_locked_balance(state: &AppState) -> u128 {
    state
        .addresses
        .entries
        .values()
        .fold(0u128, |sum, a| sum.saturating_add(a.locked_balance))
}

/// Default address first, then most recently used, then by index
pub fn sorted_addresses(state: &AppState) -> Vec<&Address> {
    let mut addresses: Vec<&Address> = state.addresses.entries.values().collect();
    addresses.sort_by(|a, b| {
        b.is_default
            .cmp(&a.is_default)
            .then(b.last_used.cmp(&a.last_used))
            .then(a.index.cmp(&b.index))
    });
    addresses
}

/// Confirmed transactions loaded for an address, newest first
pub fn address_transactions<'a>(state: &'a AppState, hash: &str) -> Vec<&'a Transaction> {
    state
        .confirmed_transactions
        .transactions
        .iter()
        .filter(|tx| tx.involves(hash))
        .collect()
}

//! Addresses of the active wallet
//!
//! Label, color and default flag come from the metadata store; balances,
//! tokens and transaction hashes come from the explorer. At most one
//! address is default.

use crate::events::Event;
use crate::slice::{Slice, SliceContext};
use halcyon_core::{Address, AddressHash};
use halcyon_sync::{AddressSyncData, TransactionsPage};
use std::collections::BTreeMap;

/// Sync status of the address set
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SyncStatus {
    /// Never synced in this session
    #[default]
    Uninitialized,
    /// Sync in flight
    Syncing,
    /// Last sync succeeded for every address
    Synced,
    /// Last sync failed for some addresses
    Failed {
        /// Addresses that failed
        failed: Vec<AddressHash>,
    },
}

/// Addresses slice
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AddressesState {
    /// Addresses by hash
    pub entries: BTreeMap<AddressHash, Address>,
    /// Sync status
    pub status: SyncStatus,
}

impl AddressesState {
    /// Insert or replace addresses, keeping a single default
    fn insert(&mut self, addresses: &[Address]) {
        for address in addresses {
            if address.is_default {
                self.clear_default_except(&address.hash);
            }
            self.entries.insert(address.hash.clone(), address.clone());
        }
    }

    fn clear_default_except(&mut self, hash: &str) {
        for (key, entry) in self.entries.iter_mut() {
            if key != hash {
                entry.is_default = false;
            }
        }
    }

    fn apply_sync(&mut self, data: &AddressSyncData) {
        let Some(address) = self.entries.get_mut(&data.hash) else {
            return;
        };
        address.balance = data.balance;
        address.locked_balance = data.locked_balance;
        address.tokens = data.tokens.clone();

        let grew = data
            .transactions
            .iter()
            .any(|tx| !address.transactions.contains(&tx.hash));
        let mut hashes: Vec<String> = data.transactions.iter().map(|tx| tx.hash.clone()).collect();
        for hash in address.transactions.drain(..) {
            if !hashes.contains(&hash) {
                hashes.push(hash);
            }
        }
        address.transactions = hashes;

        // New transactions shift every older page, so paging restarts after page 1
        if data.all_transactions_loaded {
            address.transactions_page_loaded = address.transactions_page_loaded.max(1);
            address.all_transactions_loaded = true;
        } else if grew || address.transactions_page_loaded == 0 {
            address.transactions_page_loaded = 1;
            address.all_transactions_loaded = false;
        }
        if let Some(latest) = data.transactions.iter().map(|tx| tx.timestamp).max() {
            address.last_used = address.last_used.max(latest);
        }
    }

    fn apply_page(&mut self, page: &TransactionsPage) {
        let Some(address) = self.entries.get_mut(&page.hash) else {
            return;
        };
        for tx in &page.transactions {
            if !address.transactions.contains(&tx.hash) {
                address.transactions.push(tx.hash.clone());
            }
        }
        address.transactions_page_loaded = address.transactions_page_loaded.max(page.page);
        address.all_transactions_loaded = page.all_loaded;
    }
}

impl Slice for AddressesState {
    fn initial(_ctx: &SliceContext) -> Self {
        Self::default()
    }

    fn reduce(&mut self, event: &Event) {
        match event {
            Event::WalletUnlocked(session) | Event::WalletSwitched(session) => {
                self.entries.clear();
                self.insert(&session.addresses);
            }
            Event::AddressesAdded { addresses, .. } => self.insert(addresses),
            Event::AddressSettingsSaved { hash, settings, .. } => {
                if !self.entries.contains_key(hash) {
                    return;
                }
                if settings.is_default {
                    self.clear_default_except(hash);
                }
                if let Some(address) = self.entries.get_mut(hash) {
                    address.apply_settings(settings);
                }
            }
            Event::SyncStarted { .. } => self.status = SyncStatus::Syncing,
            Event::AddressesDataSynced { data, .. } => {
                for entry in data {
                    self.apply_sync(entry);
                }
                if self.status == SyncStatus::Syncing {
                    self.status = SyncStatus::Synced;
                }
            }
            Event::SyncFailed { failures, .. } => {
                self.status = SyncStatus::Failed {
                    failed: failures.iter().map(|(hash, _)| hash.clone()).collect(),
                };
            }
            Event::AddressTransactionsPageLoaded { page, .. } => self.apply_page(page),
            Event::AddressTokensSynced { hash, tokens, .. } => {
                if let Some(address) = self.entries.get_mut(hash) {
                    address.tokens = tokens.clone();
                }
            }
            _ => {}
        }
    }

    fn on_wallet_locked(&mut self, ctx: &SliceContext) {
        *self = Self::initial(ctx);
    }

    fn on_wallet_switched(&mut self, ctx: &SliceContext) {
        *self = Self::initial(ctx);
    }

    fn on_active_wallet_deleted(&mut self, ctx: &SliceContext) {
        *self = Self::initial(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::SessionKey;
    use halcyon_core::{AddressSettings, DerivedAddress};
    use halcyon_sync::mock::transaction;

    fn address(hash: &str, index: u32, is_default: bool) -> Address {
        let derived = DerivedAddress {
            hash: hash.to_string(),
            public_key: String::new(),
            index,
            group: 0,
        };
        let settings = AddressSettings {
            is_default,
            ..AddressSettings::default()
        };
        Address::new(&derived, &settings)
    }

    fn state_with(addresses: Vec<Address>) -> AddressesState {
        let mut state = AddressesState::default();
        state.reduce(&Event::AddressesAdded {
            session: SessionKey::new("w", 1),
            addresses,
        });
        state
    }

    fn defaults(state: &AddressesState) -> Vec<&str> {
        state
            .entries
            .values()
            .filter(|a| a.is_default)
            .map(|a| a.hash.as_str())
            .collect()
    }

    #[test]
    fn test_added_default_replaces_previous() {
        let mut state = state_with(vec![address("a", 0, true)]);
        state.reduce(&Event::AddressesAdded {
            session: SessionKey::new("w", 1),
            addresses: vec![address("b", 1, true)],
        });
        assert_eq!(defaults(&state), vec!["b"]);
    }

    #[test]
    fn test_settings_saved_single_default() {
        let mut state = state_with(vec![address("a", 0, true), address("b", 1, false)]);
        state.reduce(&Event::AddressSettingsSaved {
            session: SessionKey::new("w", 1),
            hash: "b".to_string(),
            settings: AddressSettings {
                label: Some("Main".to_string()),
                color: "#000000".to_string(),
                is_default: true,
            },
        });
        assert_eq!(defaults(&state), vec!["b"]);
        assert_eq!(state.entries["b"].label.as_deref(), Some("Main"));
    }

    #[test]
    fn test_unknown_address_settings_ignored() {
        let mut state = state_with(vec![address("a", 0, true)]);
        state.reduce(&Event::AddressSettingsSaved {
            session: SessionKey::new("w", 1),
            hash: "zzz".to_string(),
            settings: AddressSettings {
                is_default: true,
                ..AddressSettings::default()
            },
        });
        assert_eq!(defaults(&state), vec!["a"]);
    }

    #[test]
    fn test_sync_merges_history_and_cursor() {
        let mut state = state_with(vec![address("a", 0, false)]);
        state.reduce(&Event::SyncStarted {
            session: SessionKey::new("w", 1),
        });
        state.reduce(&Event::AddressesDataSynced {
            session: SessionKey::new("w", 1),
            data: vec![AddressSyncData {
                hash: "a".to_string(),
                balance: 7,
                locked_balance: 1,
                tokens: Vec::new(),
                transactions: vec![transaction("t2", "a", 20), transaction("t1", "a", 10)],
                mempool: Vec::new(),
                all_transactions_loaded: false,
            }],
        });

        let a = &state.entries["a"];
        assert_eq!(state.status, SyncStatus::Synced);
        assert_eq!(a.balance, 7);
        assert_eq!(a.transactions, vec!["t2".to_string(), "t1".to_string()]);
        assert_eq!(a.transactions_page_loaded, 1);
        assert_eq!(a.last_used, 20);

        state.reduce(&Event::AddressTransactionsPageLoaded {
            session: SessionKey::new("w", 1),
            page: TransactionsPage {
                hash: "a".to_string(),
                page: 2,
                transactions: vec![transaction("t0", "a", 5), transaction("t1", "a", 10)],
                all_loaded: true,
            },
        });
        let a = &state.entries["a"];
        assert_eq!(a.transactions.len(), 3);
        assert_eq!(a.transactions_page_loaded, 2);
        assert!(a.all_transactions_loaded);
    }

    fn synced(hash: &str, transactions: Vec<halcyon_core::Transaction>, complete: bool) -> Event {
        Event::AddressesDataSynced {
            session: SessionKey::new("w", 1),
            data: vec![AddressSyncData {
                hash: hash.to_string(),
                balance: 0,
                locked_balance: 0,
                tokens: Vec::new(),
                transactions,
                mempool: Vec::new(),
                all_transactions_loaded: complete,
            }],
        }
    }

    #[test]
    fn test_history_growth_reopens_paging() {
        let mut state = state_with(vec![address("a", 0, false)]);
        let old: Vec<_> = (0..3)
            .map(|i| transaction(&format!("old{}", i), "a", i))
            .collect();
        state.reduce(&synced("a", old, true));
        assert!(state.entries["a"].all_transactions_loaded);

        // Twenty newer transactions push the old ones onto page 2
        let fresh: Vec<_> = (0..20)
            .map(|i| transaction(&format!("new{}", i), "a", 100 + i))
            .collect();
        state.reduce(&synced("a", fresh, false));

        let a = &state.entries["a"];
        assert!(!a.all_transactions_loaded);
        assert_eq!(a.transactions_page_loaded, 1);
        assert_eq!(a.transactions.len(), 23);
    }

    #[test]
    fn test_unchanged_full_page_keeps_cursor() {
        let mut state = state_with(vec![address("a", 0, false)]);
        let page: Vec<_> = (0..20)
            .map(|i| transaction(&format!("t{}", i), "a", i))
            .collect();
        state.reduce(&synced("a", page.clone(), false));
        state.reduce(&Event::AddressTransactionsPageLoaded {
            session: SessionKey::new("w", 1),
            page: TransactionsPage {
                hash: "a".to_string(),
                page: 2,
                transactions: vec![transaction("t20", "a", 0)],
                all_loaded: true,
            },
        });

        state.reduce(&synced("a", page, false));
        let a = &state.entries["a"];
        assert_eq!(a.transactions_page_loaded, 2);
        assert!(a.all_transactions_loaded);
    }

    #[test]
    fn test_sync_failure_status() {
        let mut state = state_with(vec![address("a", 0, false)]);
        state.reduce(&Event::SyncFailed {
            session: SessionKey::new("w", 1),
            failures: vec![("a".to_string(), "timeout".to_string())],
        });
        assert_eq!(
            state.status,
            SyncStatus::Failed {
                failed: vec!["a".to_string()]
            }
        );
    }
}

//! State store integration tests
//!
//! Tests cover:
//! - Every slice back to its initial state after a lock, for any history
//! - Wallet list re-read from the context source on reset
//! - Stale sync results after a switch or a re-unlock of the same wallet

use halcyon_core::{
    Address, AddressSettings, Contact, DerivedAddress, GeneralSettings, PendingTransaction,
    PendingTransactionKind, Settings, ThemeMode, WalletMeta,
};
use halcyon_state::{
    selectors, AppState, ContextSource, Event, SessionKey, Slice, SliceContext, Snackbar,
    Store, WalletSession,
};
use halcyon_sync::mock::transaction;
use halcyon_sync::{AddressSyncData, TransactionsPage};
use proptest::prelude::*;
use std::sync::{Arc, Mutex};

const WALLET: &str = "w1";

/// Context whose wallet list can change between resets
#[derive(Default)]
struct SharedContext(Mutex<SliceContext>);

impl ContextSource for SharedContext {
    fn context(&self) -> SliceContext {
        self.0.lock().unwrap().clone()
    }
}

fn meta(id: &str) -> WalletMeta {
    WalletMeta {
        id: id.to_string(),
        name: format!("Wallet {}", id),
        last_used: 1,
    }
}

fn address(hash: &str, index: u32, is_default: bool) -> Address {
    let derived = DerivedAddress {
        hash: hash.to_string(),
        public_key: String::new(),
        index,
        group: index % 4,
    };
    Address::new(
        &derived,
        &AddressSettings {
            is_default,
            ..AddressSettings::default()
        },
    )
}

fn session(id: &str) -> WalletSession {
    session_at(id, 1)
}

fn session_at(id: &str, generation: u64) -> WalletSession {
    WalletSession {
        wallet: meta(id),
        generation,
        passphrase_used: false,
        addresses: vec![address("a0", 0, true), address("a1", 1, false)],
        contacts: vec![Contact {
            id: "c1".to_string(),
            name: "Carol".to_string(),
            address: "carol-address".to_string(),
        }],
        pending: vec![PendingTransaction {
            hash: "p1".to_string(),
            from_address: "a0".to_string(),
            to_address: "carol-address".to_string(),
            amount: 5,
            timestamp: 1,
            kind: PendingTransactionKind::Transfer,
        }],
    }
}

fn sync_data(hash: &str) -> AddressSyncData {
    AddressSyncData {
        hash: hash.to_string(),
        balance: 100,
        locked_balance: 0,
        tokens: Vec::new(),
        transactions: vec![transaction(&format!("{}-t", hash), hash, 50)],
        mempool: Vec::new(),
        all_transactions_loaded: true,
    }
}

/// Events a session may go through
fn session_event(choice: u8) -> Event {
    let session = SessionKey::new(WALLET, 1);
    match choice % 12 {
        0 => Event::AddressesAdded {
            session,
            addresses: vec![address("a2", 2, true)],
        },
        1 => Event::AddressSettingsSaved {
            session,
            hash: "a1".to_string(),
            settings: AddressSettings {
                label: Some("Savings".to_string()),
                color: "#FF0000".to_string(),
                is_default: true,
            },
        },
        2 => Event::SyncStarted { session },
        3 => Event::AddressesDataSynced {
            session,
            data: vec![sync_data("a0"), sync_data("a1")],
        },
        4 => Event::AddressTransactionsPageLoaded {
            session,
            page: TransactionsPage {
                hash: "a0".to_string(),
                page: 2,
                transactions: vec![transaction("old", "a0", 1)],
                all_loaded: true,
            },
        },
        5 => Event::SyncFailed {
            session,
            failures: vec![("a1".to_string(), "timeout".to_string())],
        },
        6 => Event::ContactStored {
            session,
            contact: Contact {
                id: "c2".to_string(),
                name: "Dave".to_string(),
                address: "dave-address".to_string(),
            },
        },
        7 => Event::ContactDeleted {
            session,
            contact_id: "c1".to_string(),
        },
        8 => Event::PendingTransactionsReconciled {
            session,
            dropped: vec!["p1".to_string()],
        },
        9 => Event::NetworkConnecting,
        10 => Event::NetworkOnline {
            version: "2.0".to_string(),
        },
        _ => Event::SnackbarMessage(Snackbar::info("Copied")),
    }
}

fn single_default(state: &AppState) -> bool {
    state
        .addresses
        .entries
        .values()
        .filter(|a| a.is_default)
        .count()
        <= 1
}

// =============================================================================
// Lifecycle
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: after a lock every slice equals its initial state
    #[test]
    fn prop_lock_resets_every_slice(choices in prop::collection::vec(any::<u8>(), 0..40)) {
        let context = Arc::new(SharedContext::default());
        let mut store = Store::new(context.clone());
        store.dispatch(Event::WalletUnlocked(session(WALLET)));
        for choice in choices {
            store.dispatch(session_event(choice));
            prop_assert!(single_default(store.state()));
        }
        store.dispatch(Event::WalletLocked);

        prop_assert_eq!(store.state(), &AppState::initial(&context.context()));
        prop_assert!(store.state().addresses.entries.is_empty());
        prop_assert!(store.state().contacts.contacts.is_empty());
        prop_assert!(store.state().confirmed_transactions.transactions.is_empty());
        prop_assert!(store.state().pending_transactions.transactions.is_empty());
    }
}

#[test]
fn test_reset_relists_wallets_and_settings() {
    let context = Arc::new(SharedContext::default());
    let mut store = Store::new(context.clone());
    store.dispatch(Event::WalletUnlocked(session(WALLET)));

    {
        let mut ctx = context.0.lock().unwrap();
        ctx.wallets = vec![meta(WALLET), meta("w2")];
        ctx.settings = Settings {
            general: GeneralSettings {
                theme: ThemeMode::Dark,
                ..GeneralSettings::default()
            },
            ..Settings::default()
        };
    }
    store.dispatch(Event::WalletLocked);

    let state = store.state();
    assert!(state.wallet.is_locked());
    assert_eq!(state.wallet.wallets.len(), 2);
    assert_eq!(state.settings.settings.general.theme, ThemeMode::Dark);
}

#[test]
fn test_deleted_wallet_leaves_list() {
    let context = Arc::new(SharedContext::default());
    context.0.lock().unwrap().wallets = vec![meta(WALLET), meta("w2")];
    let mut store = Store::new(context.clone());
    store.dispatch(Event::WalletUnlocked(session(WALLET)));

    context.0.lock().unwrap().wallets = vec![meta("w2")];
    store.dispatch(Event::ActiveWalletDeleted {
        wallet_id: WALLET.to_string(),
    });

    let ids: Vec<&str> = store
        .state()
        .wallet
        .wallets
        .iter()
        .map(|w| w.id.as_str())
        .collect();
    assert_eq!(ids, vec!["w2"]);
    assert!(store.state().addresses.entries.is_empty());
}

// =============================================================================
// Stale results
// =============================================================================

#[test]
fn test_sync_result_after_switch_is_dropped() {
    let mut store = Store::new(Arc::new(SharedContext::default()));
    store.dispatch(Event::WalletUnlocked(session(WALLET)));
    store.dispatch(Event::WalletSwitched(session("w2")));

    let applied = store.dispatch(Event::AddressesDataSynced {
        session: SessionKey::new(WALLET, 1),
        data: vec![sync_data("a0")],
    });

    assert!(!applied);
    assert_eq!(selectors::total_balance(store.state()), 0);
    assert!(store.state().confirmed_transactions.transactions.is_empty());
}

#[test]
fn test_sync_result_for_active_wallet_applies() {
    let mut store = Store::new(Arc::new(SharedContext::default()));
    store.dispatch(Event::WalletUnlocked(session(WALLET)));
    store.dispatch(Event::AddressesDataSynced {
        session: SessionKey::new(WALLET, 1),
        data: vec![sync_data("a0"), sync_data("a1")],
    });

    let state = store.state();
    assert_eq!(selectors::total_balance(state), 200);
    assert_eq!(state.confirmed_transactions.transactions.len(), 2);
    assert_eq!(
        selectors::address_transactions(state, "a0").len(),
        1
    );
}

#[test]
fn test_sync_result_after_reunlock_is_dropped() {
    let mut store = Store::new(Arc::new(SharedContext::default()));
    store.dispatch(Event::WalletUnlocked(session_at(WALLET, 1)));
    // Same wallet unlocked again, e.g. with a passphrase
    store.dispatch(Event::WalletUnlocked(session_at(WALLET, 2)));

    let applied = store.dispatch(Event::AddressesDataSynced {
        session: SessionKey::new(WALLET, 1),
        data: vec![sync_data("a0")],
    });

    assert!(!applied);
    assert_eq!(selectors::total_balance(store.state()), 0);
    assert!(store.state().confirmed_transactions.transactions.is_empty());
}

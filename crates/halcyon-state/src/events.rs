//! Events applied to the state store
//!
//! Every state change goes through one of these variants. Events carrying a
//! [`SessionKey`] hold data fetched or stored during that unlock of a wallet
//! and are dropped by the store when another session (or none) is active by
//! the time they arrive. Unlocking the same wallet again, with or without a
//! passphrase, starts a new session.

use halcyon_core::{
    Address, AddressHash, AddressSettings, Contact, GeneralSettings, NetworkSettings,
    PendingTransaction, TokenBalance, WalletId, WalletMeta,
};
use halcyon_sync::{AddressSyncData, TransactionsPage};

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnackbarKind {
    /// Neutral
    Info,
    /// Operation succeeded
    Success,
    /// Something failed
    Alert,
}

/// Transient notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snackbar {
    /// Text shown to the user
    pub text: String,
    /// Severity
    pub kind: SnackbarKind,
    /// Auto-dismiss delay, `None` to keep until dismissed
    pub duration_ms: Option<u64>,
}

impl Snackbar {
    /// Info notification
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: SnackbarKind::Info,
            duration_ms: Some(3_000),
        }
    }

    /// Success notification
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: SnackbarKind::Success,
            duration_ms: Some(3_000),
        }
    }

    /// Alert, kept until dismissed
    pub fn alert(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: SnackbarKind::Alert,
            duration_ms: None,
        }
    }
}

/// One unlock of one wallet
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    /// Unlocked wallet
    pub wallet_id: WalletId,
    /// Unlock counter, unique per service
    pub generation: u64,
}

impl SessionKey {
    /// Key for `wallet_id` at `generation`
    pub fn new(wallet_id: impl Into<WalletId>, generation: u64) -> Self {
        Self {
            wallet_id: wallet_id.into(),
            generation,
        }
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.wallet_id, self.generation)
    }
}

/// Data loaded when a wallet becomes active
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletSession {
    /// Wallet listing data
    pub wallet: WalletMeta,
    /// Unlock counter
    pub generation: u64,
    /// Unlocked with a passphrase
    pub passphrase_used: bool,
    /// Addresses rebuilt from derivation and metadata
    pub addresses: Vec<Address>,
    /// Contacts
    pub contacts: Vec<Contact>,
    /// Persisted pending transactions
    pub pending: Vec<PendingTransaction>,
}

impl WalletSession {
    /// Key stamped on data events of this session
    pub fn key(&self) -> SessionKey {
        SessionKey::new(self.wallet.id.clone(), self.generation)
    }
}

/// State store events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A wallet was unlocked
    WalletUnlocked(WalletSession),
    /// The active wallet was locked
    WalletLocked,
    /// Another wallet replaced the active one
    WalletSwitched(WalletSession),
    /// The active wallet was deleted from storage
    ActiveWalletDeleted {
        /// Deleted wallet
        wallet_id: WalletId,
    },
    /// A wallet was created, imported or renamed
    WalletSaved {
        /// Stored wallet
        wallet: WalletMeta,
    },
    /// Wallet list re-read from storage
    WalletsListed {
        /// All stored wallets
        wallets: Vec<WalletMeta>,
    },
    /// Addresses generated or discovered
    AddressesAdded {
        /// Owning wallet session
        session: SessionKey,
        /// New addresses
        addresses: Vec<Address>,
    },
    /// Label, color or default flag saved
    AddressSettingsSaved {
        /// Owning wallet session
        session: SessionKey,
        /// Address
        hash: AddressHash,
        /// New settings
        settings: AddressSettings,
    },
    /// A sync round started
    SyncStarted {
        /// Owning wallet session
        session: SessionKey,
    },
    /// Fresh explorer data
    AddressesDataSynced {
        /// Owning wallet session
        session: SessionKey,
        /// Per-address data
        data: Vec<AddressSyncData>,
    },
    /// Older history loaded for one address
    AddressTransactionsPageLoaded {
        /// Owning wallet session
        session: SessionKey,
        /// Loaded page(s)
        page: TransactionsPage,
    },
    /// Token balances refreshed for one address
    AddressTokensSynced {
        /// Owning wallet session
        session: SessionKey,
        /// Address
        hash: AddressHash,
        /// Token balances
        tokens: Vec<TokenBalance>,
    },
    /// Some addresses failed to sync
    SyncFailed {
        /// Owning wallet session
        session: SessionKey,
        /// Failed addresses with reasons
        failures: Vec<(AddressHash, String)>,
    },
    /// Contact created or edited
    ContactStored {
        /// Owning wallet session
        session: SessionKey,
        /// Stored contact
        contact: Contact,
    },
    /// Contact removed
    ContactDeleted {
        /// Owning wallet session
        session: SessionKey,
        /// Removed contact
        contact_id: String,
    },
    /// Transaction broadcast
    PendingTransactionAdded {
        /// Owning wallet session
        session: SessionKey,
        /// Pending entry
        transaction: PendingTransaction,
    },
    /// Pending transactions seen by the explorer or expired
    PendingTransactionsReconciled {
        /// Owning wallet session
        session: SessionKey,
        /// Removed hashes
        dropped: Vec<String>,
    },
    /// Connectivity probe started
    NetworkConnecting,
    /// Explorer reachable
    NetworkOnline {
        /// Explorer release
        version: String,
    },
    /// Explorer unreachable
    NetworkOffline {
        /// Failure reason
        reason: String,
    },
    /// General settings saved
    GeneralSettingsChanged(GeneralSettings),
    /// Network settings saved
    NetworkSettingsChanged(NetworkSettings),
    /// Local storage read or write failed
    StorageFailed {
        /// Error shown to the user
        message: String,
    },
    /// Show a notification
    SnackbarMessage(Snackbar),
    /// Dismiss the oldest notification
    SnackbarDismissed,
}

impl Event {
    /// Session whose data this event carries
    pub fn data_session(&self) -> Option<&SessionKey> {
        match self {
            Event::AddressesAdded { session, .. }
            | Event::AddressSettingsSaved { session, .. }
            | Event::SyncStarted { session }
            | Event::AddressesDataSynced { session, .. }
            | Event::AddressTransactionsPageLoaded { session, .. }
            | Event::AddressTokensSynced { session, .. }
            | Event::SyncFailed { session, .. }
            | Event::ContactStored { session, .. }
            | Event::ContactDeleted { session, .. }
            | Event::PendingTransactionAdded { session, .. }
            | Event::PendingTransactionsReconciled { session, .. } => Some(session),
            _ => None,
        }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Event::WalletUnlocked(_) => "walletUnlocked",
            Event::WalletLocked => "walletLocked",
            Event::WalletSwitched(_) => "walletSwitched",
            Event::ActiveWalletDeleted { .. } => "activeWalletDeleted",
            Event::WalletSaved { .. } => "walletSaved",
            Event::WalletsListed { .. } => "walletsListed",
            Event::AddressesAdded { .. } => "addressesAdded",
            Event::AddressSettingsSaved { .. } => "addressSettingsSaved",
            Event::SyncStarted { .. } => "syncStarted",
            Event::AddressesDataSynced { .. } => "addressesDataSynced",
            Event::AddressTransactionsPageLoaded { .. } => "addressTransactionsPageLoaded",
            Event::AddressTokensSynced { .. } => "addressTokensSynced",
            Event::SyncFailed { .. } => "syncFailed",
            Event::ContactStored { .. } => "contactStored",
            Event::ContactDeleted { .. } => "contactDeleted",
            Event::PendingTransactionAdded { .. } => "pendingTransactionAdded",
            Event::PendingTransactionsReconciled { .. } => "pendingTransactionsReconciled",
            Event::NetworkConnecting => "networkConnecting",
            Event::NetworkOnline { .. } => "networkOnline",
            Event::NetworkOffline { .. } => "networkOffline",
            Event::GeneralSettingsChanged(_) => "generalSettingsChanged",
            Event::NetworkSettingsChanged(_) => "networkSettingsChanged",
            Event::StorageFailed { .. } => "storageFailed",
            Event::SnackbarMessage(_) => "snackbarMessage",
            Event::SnackbarDismissed => "snackbarDismissed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_session() {
        let event = Event::SyncStarted {
            session: SessionKey::new("w1", 3),
        };
        assert_eq!(event.data_session(), Some(&SessionKey::new("w1", 3)));
        assert_eq!(Event::WalletLocked.data_session(), None);
        assert_eq!(Event::NetworkConnecting.data_session(), None);
    }

    #[test]
    fn test_alert_is_sticky() {
        assert_eq!(Snackbar::alert("x").duration_ms, None);
        assert!(Snackbar::info("x").duration_ms.is_some());
    }
}

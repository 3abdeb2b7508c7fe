//! State slices and the composed app state

pub mod addresses;
pub mod confirmed_transactions;
pub mod contacts;
pub mod network;
pub mod pending_transactions;
pub mod settings;
pub mod snackbar;
pub mod wallet;

pub use addresses::{AddressesState, SyncStatus};
pub use confirmed_transactions::ConfirmedTransactionsState;
pub use contacts::ContactsState;
pub use network::{NetworkState, NetworkStatus};
pub use pending_transactions::PendingTransactionsState;
pub use settings::SettingsState;
pub use snackbar::SnackbarState;
pub use wallet::WalletState;

use crate::events::Event;
use crate::slice::{Slice, SliceContext};

/// Every slice of the app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    /// Wallet slice
    pub wallet: WalletState,
    /// Addresses slice
    pub addresses: AddressesState,
    /// Contacts slice
    pub contacts: ContactsState,
    /// Confirmed transactions slice
    pub confirmed_transactions: ConfirmedTransactionsState,
    /// Pending transactions slice
    pub pending_transactions: PendingTransactionsState,
    /// Network slice
    pub network: NetworkState,
    /// Settings slice
    pub settings: SettingsState,
    /// Snackbar slice
    pub snackbar: SnackbarState,
}

impl Slice for AppState {
    fn initial(ctx: &SliceContext) -> Self {
        Self {
            wallet: WalletState::initial(ctx),
            addresses: AddressesState::initial(ctx),
            contacts: ContactsState::initial(ctx),
            confirmed_transactions: ConfirmedTransactionsState::initial(ctx),
            pending_transactions: PendingTransactionsState::initial(ctx),
            network: NetworkState::initial(ctx),
            settings: SettingsState::initial(ctx),
            snackbar: SnackbarState::initial(ctx),
        }
    }

    fn reduce(&mut self, event: &Event) {
        self.wallet.reduce(event);
        self.addresses.reduce(event);
        self.contacts.reduce(event);
        self.confirmed_transactions.reduce(event);
        self.pending_transactions.reduce(event);
        self.network.reduce(event);
        self.settings.reduce(event);
        self.snackbar.reduce(event);
    }

    fn on_wallet_locked(&mut self, ctx: &SliceContext) {
        self.wallet.on_wallet_locked(ctx);
        self.addresses.on_wallet_locked(ctx);
        self.contacts.on_wallet_locked(ctx);
        self.confirmed_transactions.on_wallet_locked(ctx);
        self.pending_transactions.on_wallet_locked(ctx);
        self.network.on_wallet_locked(ctx);
        self.settings.on_wallet_locked(ctx);
        self.snackbar.on_wallet_locked(ctx);
    }

    fn on_wallet_switched(&mut self, ctx: &SliceContext) {
        self.wallet.on_wallet_switched(ctx);
        self.addresses.on_wallet_switched(ctx);
        self.contacts.on_wallet_switched(ctx);
        self.confirmed_transactions.on_wallet_switched(ctx);
        self.pending_transactions.on_wallet_switched(ctx);
        self.network.on_wallet_switched(ctx);
        self.settings.on_wallet_switched(ctx);
        self.snackbar.on_wallet_switched(ctx);
    }

    fn on_active_wallet_deleted(&mut self, ctx: &SliceContext) {
        self.wallet.on_active_wallet_deleted(ctx);
        self.addresses.on_active_wallet_deleted(ctx);
        self.contacts.on_active_wallet_deleted(ctx);
        self.confirmed_transactions.on_active_wallet_deleted(ctx);
        self.pending_transactions.on_active_wallet_deleted(ctx);
        self.network.on_active_wallet_deleted(ctx);
        self.settings.on_active_wallet_deleted(ctx);
        self.snackbar.on_active_wallet_deleted(ctx);
    }
}

//! Confirmed transactions of the active wallet

use crate::events::Event;
use crate::slice::{Slice, SliceContext};
use halcyon_core::{merge_transactions, Transaction};

/// Confirmed transactions slice
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfirmedTransactionsState {
    /// Unique by hash, newest first
    pub transactions: Vec<Transaction>,
}

impl Slice for ConfirmedTransactionsState {
    fn initial(_ctx: &SliceContext) -> Self {
        Self::default()
    }

    fn reduce(&mut self, event: &Event) {
        match event {
            Event::WalletUnlocked(_) | Event::WalletSwitched(_) => self.transactions.clear(),
            Event::AddressesDataSynced { data, .. } => {
                let incoming = data
                    .iter()
                    .flat_map(|entry| entry.transactions.iter().cloned())
                    .collect();
                merge_transactions(&mut self.transactions, incoming);
            }
            Event::AddressTransactionsPageLoaded { page, .. } => {
                merge_transactions(&mut self.transactions, page.transactions.clone());
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

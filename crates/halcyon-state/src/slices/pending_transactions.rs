//! Pending transactions of the active wallet

use crate::events::Event;
use crate::slice::{Slice, SliceContext};
use halcyon_core::PendingTransaction;

/// Pending transactions slice
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PendingTransactionsState {
    /// Broadcast but not yet seen by the explorer
    pub transactions: Vec<PendingTransaction>,
}

impl Slice for PendingTransactionsState {
    fn initial(_ctx: &SliceContext) -> Self {
        Self::default()
    }

    fn reduce(&mut self, event: &Event) {
        match event {
            Event::WalletUnlocked(session) | Event::WalletSwitched(session) => {
                self.transactions = session.pending.clone();
            }
            Event::PendingTransactionAdded { transaction, .. } => {
                if !self.transactions.iter().any(|t| t.hash == transaction.hash) {
                    self.transactions.push(transaction.clone());
                }
            }
            Event::PendingTransactionsReconciled { dropped, .. } => {
                self.transactions.retain(|t| !dropped.contains(&t.hash));
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

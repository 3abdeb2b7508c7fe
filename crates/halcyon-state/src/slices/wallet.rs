//! Active wallet and wallet list

use crate::events::{Event, SessionKey};
use crate::slice::{Slice, SliceContext};
use halcyon_core::{WalletId, WalletMeta};

/// Wallet slice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletState {
    /// Unlocked wallet, `None` while locked
    pub active: Option<WalletMeta>,
    /// Unlock counter of the active session
    pub generation: u64,
    /// Active wallet was unlocked with a passphrase
    pub passphrase_used: bool,
    /// Stored wallets, most recently used first
    pub wallets: Vec<WalletMeta>,
}

impl WalletState {
    /// ID of the active wallet
    pub fn active_id(&self) -> Option<&WalletId> {
        self.active.as_ref().map(|w| &w.id)
    }

    /// Key of the active session
    pub fn active_session(&self) -> Option<SessionKey> {
        self.active
            .as_ref()
            .map(|w| SessionKey::new(w.id.clone(), self.generation))
    }

    /// No wallet unlocked
    pub fn is_locked(&self) -> bool {
        self.active.is_none()
    }

    fn upsert(&mut self, wallet: &WalletMeta) {
        match self.wallets.iter_mut().find(|w| w.id == wallet.id) {
            Some(existing) => *existing = wallet.clone(),
            None => self.wallets.push(wallet.clone()),
        }
        self.wallets.sort_by(|a, b| b.last_used.cmp(&a.last_used));
    }
}

impl Slice for WalletState {
    fn initial(ctx: &SliceContext) -> Self {
        Self {
            active: None,
            generation: 0,
            passphrase_used: false,
            wallets: ctx.wallets.clone(),
        }
    }

    fn reduce(&mut self, event: &Event) {
        match event {
            Event::WalletUnlocked(session) | Event::WalletSwitched(session) => {
                self.active = Some(session.wallet.clone());
                self.generation = session.generation;
                self.passphrase_used = session.passphrase_used;
                self.upsert(&session.wallet);
            }
            Event::WalletSaved { wallet } => {
                if self.active_id() == Some(&wallet.id) {
                    self.active = Some(wallet.clone());
                }
                self.upsert(wallet);
            }
            Event::WalletsListed { wallets } => {
                self.wallets = wallets.clone();
            }
            Event::ActiveWalletDeleted { wallet_id } => {
                self.wallets.retain(|w| &w.id != wallet_id);
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
    use crate::events::WalletSession;

    fn meta(id: &str, last_used: i64) -> WalletMeta {
        WalletMeta {
            id: id.to_string(),
            name: id.to_string(),
            last_used,
        }
    }

    fn session(wallet: WalletMeta) -> WalletSession {
        WalletSession {
            wallet,
            generation: 1,
            passphrase_used: false,
            addresses: Vec::new(),
            contacts: Vec::new(),
            pending: Vec::new(),
        }
    }

    #[test]
    fn test_unlock_moves_wallet_first() {
        let ctx = SliceContext {
            wallets: vec![meta("a", 2), meta("b", 1)],
            ..SliceContext::default()
        };
        let mut state = WalletState::initial(&ctx);
        state.reduce(&Event::WalletUnlocked(session(meta("b", 3))));

        assert_eq!(state.active_id().map(String::as_str), Some("b"));
        assert_eq!(state.wallets[0].id, "b");
        assert_eq!(state.wallets.len(), 2);
    }

    #[test]
    fn test_rename_updates_active() {
        let mut state = WalletState::initial(&SliceContext::default());
        state.reduce(&Event::WalletUnlocked(session(meta("a", 1))));
        let mut renamed = meta("a", 1);
        renamed.name = "Savings".to_string();
        state.reduce(&Event::WalletSaved { wallet: renamed });
        assert_eq!(state.active.as_ref().map(|w| w.name.as_str()), Some("Savings"));
    }

    #[test]
    fn test_lock_relists_from_context() {
        let mut state = WalletState::initial(&SliceContext::default());
        state.reduce(&Event::WalletUnlocked(session(meta("a", 1))));

        let ctx = SliceContext {
            wallets: vec![meta("a", 5)],
            ..SliceContext::default()
        };
        state.on_wallet_locked(&ctx);
        assert!(state.is_locked());
        assert_eq!(state.wallets, ctx.wallets);
    }
}

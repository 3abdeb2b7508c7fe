//! Unlocked wallet

use crate::keys::{seed_from_mnemonic, Seed};
use crate::models::{WalletId, WalletMeta};
use crate::Result;
use zeroize::Zeroizing;

/// Wallet decrypted in memory. The mnemonic and passphrase are wiped on drop.
pub struct UnlockedWallet {
    /// Listing data
    pub meta: WalletMeta,
    mnemonic: Zeroizing<String>,
    passphrase: Option<Zeroizing<String>>,
}

impl UnlockedWallet {
    /// Wrap decrypted wallet data
    pub fn new(meta: WalletMeta, mnemonic: String) -> Self {
        Self {
            meta,
            mnemonic: Zeroizing::new(mnemonic),
            passphrase: None,
        }
    }

    /// Switch to the passphrase sub-wallet. Empty passphrases are ignored.
    pub fn with_passphrase(mut self, passphrase: Option<String>) -> Self {
        self.passphrase = passphrase.filter(|p| !p.is_empty()).map(Zeroizing::new);
        self
    }

    /// Wallet ID
    pub fn id(&self) -> &WalletId {
        &self.meta.id
    }

    /// Mnemonic phrase
    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    /// Whether a passphrase sub-wallet is active
    pub fn is_passphrase_used(&self) -> bool {
        self.passphrase.is_some()
    }

    /// Derivation seed (includes the passphrase when one is active)
    pub fn seed(&self) -> Result<Seed> {
        seed_from_mnemonic(&self.mnemonic, self.passphrase.as_deref().map(|p| p.as_str()))
    }
}

impl std::fmt::Debug for UnlockedWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnlockedWallet")
            .field("meta", &self.meta)
            .field("mnemonic", &"<redacted>")
            .field("passphrase_used", &self.is_passphrase_used())
            .finish()
    }
}

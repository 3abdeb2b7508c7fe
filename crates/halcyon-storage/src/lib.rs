//! Encrypted local persistence for Halcyon wallets
//!
//! Wallet data lives in a string key-value store (SQLite or memory) under
//! keys namespaced as `<domain>-<walletId>`.
//!
//! ## Security Features
//!
//! - **Wallet sealing**: mnemonic encrypted under Argon2id(password)
//! - **Per-wallet data**: address metadata, contacts and pending transactions
//!   encrypted under Argon2id(mnemonic), so the data is unreadable without
//!   the wallet secret
//! - **Passphrase wallets**: never persist derived metadata
//! - **Ciphers**: ChaCha20-Poly1305 (default) or AES-256-GCM

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod address_metadata;
pub mod contacts;
pub mod encrypted;
pub mod error;
pub mod kv;
pub mod pending_transactions;
pub mod security;
pub mod settings;
pub mod wallet_storage;

pub use address_metadata::{AddressMetadataStore, ADDRESS_METADATA_DOMAIN};
pub use contacts::{ContactsStore, CONTACTS_DOMAIN};
pub use encrypted::{storage_key, Envelope, StatelessEncryptedStorage, StorageProps};
pub use error::{Error, Result};
pub use kv::{KeyValueStore, MemoryStore, SqliteStore};
pub use pending_transactions::{PendingTransactionsStore, PENDING_TRANSACTIONS_DOMAIN};
pub use security::{
    derive_key_bytes, evaluate_password, generate_salt, validate_password, EncryptionAlgorithm,
    KdfParams, MasterKey, PasswordStrength,
};
pub use settings::SettingsStore;
pub use wallet_storage::{StoredWallet, WalletStorage, WALLET_DOMAIN};

/// Domains holding per-wallet data, removed together with the wallet
pub const WALLET_DATA_DOMAINS: [&str; 3] = [
    ADDRESS_METADATA_DOMAIN,
    CONTACTS_DOMAIN,
    PENDING_TRANSACTIONS_DOMAIN,
];

use std::sync::Arc;

/// Every store of the app over one backend
pub struct Storage {
    /// Backend
    pub kv: Arc<dyn KeyValueStore>,
    /// Wallet secrets
    pub wallets: WalletStorage,
    /// Address metadata
    pub address_metadata: AddressMetadataStore,
    /// Contacts
    pub contacts: ContactsStore,
    /// Pending transactions
    pub pending_transactions: PendingTransactionsStore,
    /// Settings
    pub settings: SettingsStore,
}

impl Storage {
    /// Open all stores over `kv`
    pub fn new(kv: Arc<dyn KeyValueStore>, kdf: KdfParams) -> Self {
        Self {
            wallets: WalletStorage::new(kv.clone(), kdf),
            address_metadata: AddressMetadataStore::new(kv.clone(), kdf),
            contacts: ContactsStore::new(kv.clone(), kdf),
            pending_transactions: PendingTransactionsStore::new(kv.clone(), kdf),
            settings: SettingsStore::new(kv.clone()),
            kv,
        }
    }

    /// Stores over a fresh in-memory backend
    pub fn in_memory(kdf: KdfParams) -> Self {
        Self::new(Arc::new(MemoryStore::new()), kdf)
    }

    /// Remove a wallet and all its data
    pub fn delete_wallet(&self, wallet_id: &str) -> Result<()> {
        self.wallets.delete(wallet_id)?;
        if self.settings.active_wallet_id()?.as_deref() == Some(wallet_id) {
            self.settings.set_active_wallet_id(None)?;
        }
        Ok(())
    }
}

//! Wallet secrets storage
//!
//! Each wallet is stored under `wallet-<id>` with its listing data in the
//! clear and the mnemonic sealed under a key derived from the password.

use crate::encrypted::{storage_key, Envelope};
use crate::kv::KeyValueStore;
use crate::security::{validate_password, KdfParams};
use crate::{Error, Result, WALLET_DATA_DOMAINS};
use halcyon_core::{now_millis, validate_mnemonic, UnlockedWallet, WalletId, WalletMeta};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use zeroize::Zeroizing;

/// Domain of wallet entries
pub const WALLET_DOMAIN: &str = "wallet";

/// Maximum wallet name length
pub const MAX_WALLET_NAME_LENGTH: usize = 50;

/// Persisted wallet record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredWallet {
    /// Wallet ID
    pub id: WalletId,
    /// Display name
    pub name: String,
    /// Last unlock, milliseconds
    pub last_used: i64,
    /// Sealed mnemonic
    pub encrypted: Envelope,
}

impl StoredWallet {
    fn meta(&self) -> WalletMeta {
        WalletMeta {
            id: self.id.clone(),
            name: self.name.clone(),
            last_used: self.last_used,
        }
    }
}

/// Password-protected wallet store
pub struct WalletStorage {
    kv: Arc<dyn KeyValueStore>,
    kdf: KdfParams,
}

impl WalletStorage {
    /// Wallet storage on top of `kv`
    pub fn new(kv: Arc<dyn KeyValueStore>, kdf: KdfParams) -> Self {
        Self { kv, kdf }
    }

    /// Encrypt and persist a new wallet
    pub fn store(&self, name: &str, password: &str, mnemonic: &str) -> Result<WalletMeta> {
        let name = self.validate_name(name, None)?;
        validate_password(password)?;
        validate_mnemonic(mnemonic)?;

        let meta = WalletMeta::new(uuid::Uuid::new_v4().to_string(), name);
        let record = StoredWallet {
            id: meta.id.clone(),
            name: meta.name.clone(),
            last_used: meta.last_used,
            encrypted: Envelope::seal(mnemonic.as_bytes(), password, &self.kdf)?,
        };
        self.write(&record)?;

        tracing::info!("Stored wallet {}", meta.id);
        Ok(meta)
    }

    /// Decrypt a wallet. A wrong password yields [`Error::Decryption`].
    pub fn load(&self, id: &str, password: &str) -> Result<UnlockedWallet> {
        let record = self.read(id)?;
        let mnemonic = self.open_mnemonic(&record, password)?;
        Ok(UnlockedWallet::new(record.meta(), mnemonic.to_string()))
    }

    /// All wallets, most recently used first
    pub fn list(&self) -> Result<Vec<WalletMeta>> {
        let prefix = format!("{}-", WALLET_DOMAIN);
        let mut wallets = Vec::new();
        for key in self.kv.keys_with_prefix(&prefix)? {
            let Some(raw) = self.kv.get(&key)? else {
                continue;
            };
            match serde_json::from_str::<StoredWallet>(&raw) {
                Ok(record) => wallets.push(record.meta()),
                Err(e) => tracing::warn!("Skipping unreadable wallet entry {}: {}", key, e),
            }
        }
        wallets.sort_by(|a, b| b.last_used.cmp(&a.last_used).then(a.name.cmp(&b.name)));
        Ok(wallets)
    }

    /// Listing data of one wallet
    pub fn get(&self, id: &str) -> Result<WalletMeta> {
        self.read(id).map(|r| r.meta())
    }

    /// Mark a wallet as used now
    pub fn update_last_used(&self, id: &str) -> Result<WalletMeta> {
        let mut record = self.read(id)?;
        record.last_used = now_millis();
        self.write(&record)?;
        Ok(record.meta())
    }

    /// Rename a wallet
    pub fn rename(&self, id: &str, name: &str) -> Result<WalletMeta> {
        let name = self.validate_name(name, Some(id))?;
        let mut record = self.read(id)?;
        record.name = name;
        self.write(&record)?;
        Ok(record.meta())
    }

    /// Re-seal a wallet under a new password
    pub fn update_password(&self, id: &str, old_password: &str, new_password: &str) -> Result<()> {
        validate_password(new_password)?;
        let mut record = self.read(id)?;
        let mnemonic = self.open_mnemonic(&record, old_password)?;
        record.encrypted = Envelope::seal(mnemonic.as_bytes(), new_password, &self.kdf)?;
        self.write(&record)?;
        tracing::info!("Updated password of wallet {}", id);
        Ok(())
    }

    /// Delete a wallet and every per-wallet domain entry
    pub fn delete(&self, id: &str) -> Result<()> {
        self.kv.remove(&storage_key(WALLET_DOMAIN, id))?;
        for domain in WALLET_DATA_DOMAINS {
            self.kv.remove(&storage_key(domain, id))?;
        }
        tracing::info!("Deleted wallet {}", id);
        Ok(())
    }

    fn validate_name(&self, name: &str, editing: Option<&str>) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("Wallet name cannot be empty".to_string()));
        }
        if name.chars().count() > MAX_WALLET_NAME_LENGTH {
            return Err(Error::Validation(format!(
                "Wallet name too long (max {})",
                MAX_WALLET_NAME_LENGTH
            )));
        }
        let taken = self
            .list()?
            .iter()
            .any(|w| Some(w.id.as_str()) != editing && w.name.eq_ignore_ascii_case(name));
        if taken {
            return Err(Error::Validation(format!(
                "A wallet named \"{}\" already exists",
                name
            )));
        }
        Ok(name.to_string())
    }

    fn open_mnemonic(&self, record: &StoredWallet, password: &str) -> Result<Zeroizing<String>> {
        let bytes = Zeroizing::new(record.encrypted.open(password, &self.kdf)?);
        let mnemonic = std::str::from_utf8(&bytes)
            .map_err(|_| Error::Decryption("Mnemonic is not valid UTF-8".to_string()))?;
        Ok(Zeroizing::new(mnemonic.to_string()))
    }

    fn read(&self, id: &str) -> Result<StoredWallet> {
        let raw = self
            .kv
            .get(&storage_key(WALLET_DOMAIN, id))?
            .ok_or_else(|| Error::NotFound(format!("wallet {}", id)))?;
        serde_json::from_str(&raw).map_err(|e| Error::Decryption(format!("Invalid wallet entry: {}", e)))
    }

    fn write(&self, record: &StoredWallet) -> Result<()> {
        self.kv.set(
            &storage_key(WALLET_DOMAIN, &record.id),
            &serde_json::to_string(record)?,
        )
    }
}

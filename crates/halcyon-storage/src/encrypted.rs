//! Stateless encrypted storage
//!
//! Per-wallet JSON payloads are encrypted under a key derived from the
//! wallet's mnemonic and written as a versioned envelope under
//! `<domain>-<walletId>`. Nothing is cached: every load and store derives
//! the key again, so no key material outlives the call.

use crate::kv::KeyValueStore;
use crate::security::{generate_salt, KdfParams, MasterKey, SALT_LEN};
use crate::{Error, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use halcyon_core::UnlockedWallet;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::sync::Arc;

/// Envelope format version
pub const ENVELOPE_VERSION: &str = "1";

/// Persisted envelope: `{ "version": "1", "encrypted": "<base64>" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Format version
    pub version: String,
    /// base64 of `salt(16) || MasterKey blob`
    pub encrypted: String,
}

impl Envelope {
    /// Encrypt raw bytes under a key derived from `secret`
    pub fn seal(plaintext: &[u8], secret: &str, kdf: &KdfParams) -> Result<Self> {
        let salt = generate_salt();
        let key = MasterKey::derive(secret, &salt, kdf)?;
        let blob = key.encrypt(plaintext)?;

        let mut bytes = Vec::with_capacity(SALT_LEN + blob.len());
        bytes.extend_from_slice(&salt);
        bytes.extend_from_slice(&blob);

        Ok(Self {
            version: ENVELOPE_VERSION.to_string(),
            encrypted: BASE64.encode(bytes),
        })
    }

    /// Decrypt the envelope with `secret`
    pub fn open(&self, secret: &str, kdf: &KdfParams) -> Result<Vec<u8>> {
        if self.version != ENVELOPE_VERSION {
            return Err(Error::Decryption(format!(
                "Unsupported envelope version {}",
                self.version
            )));
        }
        let bytes = BASE64
            .decode(&self.encrypted)
            .map_err(|e| Error::Decryption(format!("Invalid base64: {}", e)))?;
        if bytes.len() <= SALT_LEN {
            return Err(Error::Decryption("Envelope too short".to_string()));
        }
        let (salt, blob) = bytes.split_at(SALT_LEN);
        MasterKey::derive(secret, salt, kdf)?.decrypt(blob)
    }

    /// Serialize and seal a JSON value
    pub fn seal_json<T: Serialize>(value: &T, secret: &str, kdf: &KdfParams) -> Result<Self> {
        let json = zeroize::Zeroizing::new(serde_json::to_vec(value)?);
        Self::seal(&json, secret, kdf)
    }

    /// Open and parse a JSON value
    pub fn open_json<T: DeserializeOwned>(&self, secret: &str, kdf: &KdfParams) -> Result<T> {
        let json = zeroize::Zeroizing::new(self.open(secret, kdf)?);
        serde_json::from_slice(&json).map_err(|e| Error::Decryption(format!("Invalid payload: {}", e)))
    }

    /// Parse an envelope from its stored string
    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| Error::Decryption(format!("Invalid envelope: {}", e)))
    }

    /// Stored string form
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Identity and secret of the wallet whose data is accessed
#[derive(Clone, Copy)]
pub struct StorageProps<'a> {
    /// Wallet ID, used to namespace the key
    pub wallet_id: &'a str,
    /// Base mnemonic, source of the encryption key
    pub mnemonic: &'a str,
    /// A passphrase sub-wallet is active: nothing is read or written
    pub passphrase_active: bool,
}

impl<'a> StorageProps<'a> {
    /// Props for an unlocked wallet
    pub fn from_wallet(wallet: &'a UnlockedWallet) -> Self {
        Self {
            wallet_id: wallet.id(),
            mnemonic: wallet.mnemonic(),
            passphrase_active: wallet.is_passphrase_used(),
        }
    }
}

impl std::fmt::Debug for StorageProps<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageProps")
            .field("wallet_id", &self.wallet_id)
            .field("passphrase_active", &self.passphrase_active)
            .finish()
    }
}

/// Storage key for a domain and wallet
pub fn storage_key(domain: &str, wallet_id: &str) -> String {
    format!("{}-{}", domain, wallet_id)
}

/// Encrypted JSON storage for one domain
pub struct StatelessEncryptedStorage<T> {
    domain: &'static str,
    kv: Arc<dyn KeyValueStore>,
    kdf: KdfParams,
    _marker: PhantomData<fn() -> T>,
}

impl<T> StatelessEncryptedStorage<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Storage for `domain` on top of `kv`
    pub fn new(domain: &'static str, kv: Arc<dyn KeyValueStore>, kdf: KdfParams) -> Self {
        Self {
            domain,
            kv,
            kdf,
            _marker: PhantomData,
        }
    }

    /// Domain name
    pub fn domain(&self) -> &'static str {
        self.domain
    }

    /// Load the payload, or the default when nothing is stored or a
    /// passphrase wallet is active.
    pub fn load(&self, props: &StorageProps<'_>) -> Result<T> {
        if props.passphrase_active {
            return Ok(T::default());
        }
        let key = storage_key(self.domain, props.wallet_id);
        match self.kv.get(&key)? {
            None => Ok(T::default()),
            Some(raw) => Envelope::parse(&raw)?
                .open_json(props.mnemonic, &self.kdf)
                .map_err(|e| {
                    tracing::warn!("Failed to decrypt {}: {}", key, e);
                    e
                }),
        }
    }

    /// Encrypt and write the payload; no-op when a passphrase wallet is active
    pub fn store(&self, data: &T, props: &StorageProps<'_>) -> Result<()> {
        if props.passphrase_active {
            tracing::debug!("Skipping {} write for passphrase wallet", self.domain);
            return Ok(());
        }
        let envelope = Envelope::seal_json(data, props.mnemonic, &self.kdf)?;
        self.kv
            .set(&storage_key(self.domain, props.wallet_id), &envelope.to_json()?)
    }

    /// Remove the wallet's entry
    pub fn delete(&self, wallet_id: &str) -> Result<()> {
        self.kv.remove(&storage_key(self.domain, wallet_id))
    }
}

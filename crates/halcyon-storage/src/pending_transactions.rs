//! Pending transactions storage
//!
//! Keeps broadcast-but-unconfirmed transactions across restarts.

use crate::encrypted::{StatelessEncryptedStorage, StorageProps};
use crate::kv::KeyValueStore;
use crate::security::KdfParams;
use crate::Result;
use halcyon_core::PendingTransaction;
use std::sync::Arc;

/// Domain of pending transaction entries
pub const PENDING_TRANSACTIONS_DOMAIN: &str = "pending-transactions";

/// Pending transactions store
pub struct PendingTransactionsStore {
    storage: StatelessEncryptedStorage<Vec<PendingTransaction>>,
}

impl PendingTransactionsStore {
    /// Store on top of `kv`
    pub fn new(kv: Arc<dyn KeyValueStore>, kdf: KdfParams) -> Self {
        Self {
            storage: StatelessEncryptedStorage::new(PENDING_TRANSACTIONS_DOMAIN, kv, kdf),
        }
    }

    /// All pending transactions of the wallet
    pub fn load(&self, props: &StorageProps<'_>) -> Result<Vec<PendingTransaction>> {
        self.storage.load(props)
    }

    /// Append a transaction unless its hash is already stored
    pub fn store_one(
        &self,
        props: &StorageProps<'_>,
        tx: PendingTransaction,
    ) -> Result<Vec<PendingTransaction>> {
        let mut pending = self.load(props)?;
        if pending.iter().any(|p| p.hash == tx.hash) {
            return Ok(pending);
        }
        pending.push(tx);
        self.storage.store(&pending, props)?;
        Ok(pending)
    }

    /// Merge a full in-flight list into what is stored, deduplicated by hash
    pub fn store_all(
        &self,
        props: &StorageProps<'_>,
        txs: Vec<PendingTransaction>,
    ) -> Result<Vec<PendingTransaction>> {
        let mut pending = self.load(props)?;
        let before = pending.len();
        for tx in txs {
            if !pending.iter().any(|p| p.hash == tx.hash) {
                pending.push(tx);
            }
        }
        if pending.len() != before {
            self.storage.store(&pending, props)?;
        }
        Ok(pending)
    }

    /// Drop the given hashes
    pub fn remove(
        &self,
        props: &StorageProps<'_>,
        hashes: &[String],
    ) -> Result<Vec<PendingTransaction>> {
        let mut pending = self.load(props)?;
        let before = pending.len();
        pending.retain(|p| !hashes.contains(&p.hash));
        if pending.len() != before {
            self.storage.store(&pending, props)?;
        }
        Ok(pending)
    }

    /// Remove every pending transaction of a wallet
    pub fn delete(&self, wallet_id: &str) -> Result<()> {
        self.storage.delete(wallet_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use halcyon_core::PendingTransactionKind;

    fn props() -> StorageProps<'static> {
        StorageProps {
            wallet_id: "w1",
            mnemonic: "test mnemonic",
            passphrase_active: false,
        }
    }

    fn pending(hash: &str) -> PendingTransaction {
        PendingTransaction {
            hash: hash.to_string(),
            from_address: "from".to_string(),
            to_address: "to".to_string(),
            amount: 1,
            timestamp: 0,
            kind: PendingTransactionKind::Transfer,
        }
    }

    #[test]
    fn test_store_deduplicates() {
        let store = PendingTransactionsStore::new(Arc::new(MemoryStore::new()), KdfParams::LIGHT);
        store.store_one(&props(), pending("a")).unwrap();
        store.store_one(&props(), pending("a")).unwrap();
        let all = store
            .store_all(&props(), vec![pending("a"), pending("b")])
            .unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(store.load(&props()).unwrap().len(), 2);
    }

    #[test]
    fn test_remove() {
        let store = PendingTransactionsStore::new(Arc::new(MemoryStore::new()), KdfParams::LIGHT);
        store
            .store_all(&props(), vec![pending("a"), pending("b"), pending("c")])
            .unwrap();
        let left = store
            .remove(&props(), &["a".to_string(), "c".to_string()])
            .unwrap();
        assert_eq!(left, vec![pending("b")]);
        assert_eq!(store.load(&props()).unwrap(), vec![pending("b")]);
    }
}

//! Storage integration tests
//!
//! Tests cover:
//! - Wallet store/load round trip on a SQLite file
//! - Single default address across random metadata updates
//! - Contact uniqueness without mutation on rejection
//! - Per-wallet isolation and deletion

use halcyon_core::{address_from_public_key, generate_mnemonic, AddressMetadata, Contact};
use halcyon_storage::{
    Error, KdfParams, KeyValueStore, SqliteStore, Storage, StorageProps, ADDRESS_METADATA_DOMAIN,
    CONTACTS_DOMAIN,
};
use proptest::prelude::*;
use std::sync::Arc;
use tempfile::TempDir;

fn sqlite_storage(dir: &TempDir) -> Storage {
    let kv: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::open(dir.path().join("halcyon.db")).unwrap());
    Storage::new(kv, KdfParams::LIGHT)
}

fn metadata(index: u32, is_default: bool) -> AddressMetadata {
    AddressMetadata {
        index,
        label: None,
        color: "#10B981".to_string(),
        is_default,
    }
}

// =============================================================================
// Wallets
// =============================================================================

#[test]
fn test_wallet_roundtrip_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let mnemonic = generate_mnemonic(Some(24)).unwrap();
    let id = {
        let storage = sqlite_storage(&dir);
        storage.wallets.store("Main", "correct horse", &mnemonic).unwrap().id
    };

    let storage = sqlite_storage(&dir);
    let wallet = storage.wallets.load(&id, "correct horse").unwrap();
    assert_eq!(wallet.mnemonic(), mnemonic);

    let raw = storage.kv.get(&format!("wallet-{}", id)).unwrap().unwrap();
    assert!(!raw.contains(&mnemonic));
}

#[test]
fn test_delete_wallet_removes_domain_entries() {
    let dir = TempDir::new().unwrap();
    let storage = sqlite_storage(&dir);
    let mnemonic = generate_mnemonic(Some(12)).unwrap();
    let meta = storage.wallets.store("Main", "password123", &mnemonic).unwrap();
    storage.settings.set_active_wallet_id(Some(&meta.id)).unwrap();

    let props = StorageProps {
        wallet_id: &meta.id,
        mnemonic: &mnemonic,
        passphrase_active: false,
    };
    storage.address_metadata.store_one(&props, metadata(0, true)).unwrap();
    storage
        .contacts
        .store_one(
            &props,
            Contact {
                id: String::new(),
                name: "Alice".to_string(),
                address: address_from_public_key(&[7u8; 33]),
            },
        )
        .unwrap();

    storage.delete_wallet(&meta.id).unwrap();

    assert!(storage.kv.keys_with_prefix(ADDRESS_METADATA_DOMAIN).unwrap().is_empty());
    assert!(storage.kv.keys_with_prefix(CONTACTS_DOMAIN).unwrap().is_empty());
    assert!(storage.wallets.list().unwrap().is_empty());
    assert_eq!(storage.settings.active_wallet_id().unwrap(), None);
}

#[test]
fn test_wallet_data_isolated_by_mnemonic() {
    let storage = Storage::in_memory(KdfParams::LIGHT);
    let props_a = StorageProps {
        wallet_id: "a",
        mnemonic: "first secret",
        passphrase_active: false,
    };
    storage.address_metadata.store_one(&props_a, metadata(0, true)).unwrap();

    // same id, other secret: the blob cannot be read
    let props_b = StorageProps {
        mnemonic: "second secret",
        ..props_a
    };
    assert!(matches!(
        storage.address_metadata.load(&props_b),
        Err(Error::Decryption(_))
    ));
}

// =============================================================================
// Contacts
// =============================================================================

#[test]
fn test_duplicate_contact_does_not_mutate() {
    let storage = Storage::in_memory(KdfParams::LIGHT);
    let props = StorageProps {
        wallet_id: "w",
        mnemonic: "secret",
        passphrase_active: false,
    };
    let address = address_from_public_key(&[1u8; 33]);
    storage
        .contacts
        .store_one(
            &props,
            Contact {
                id: String::new(),
                name: "Alice".to_string(),
                address: address.clone(),
            },
        )
        .unwrap();
    let before = storage.kv.get("contacts-w").unwrap();

    let err = storage
        .contacts
        .store_one(
            &props,
            Contact {
                id: String::new(),
                name: "Bob".to_string(),
                address,
            },
        )
        .unwrap_err();
    let core: halcyon_core::Error = err.into();
    assert!(core.user_message().contains("already exists"));
    assert_eq!(storage.kv.get("contacts-w").unwrap(), before);
}

// =============================================================================
// Address metadata properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Property: after setting A as default, A is the only default
    #[test]
    fn prop_single_default_address(
        updates in prop::collection::vec((0u32..6, any::<bool>()), 1..8),
        chosen in 0u32..6,
    ) {
        let storage = Storage::in_memory(KdfParams::LIGHT);
        let props = StorageProps {
            wallet_id: "w",
            mnemonic: "secret",
            passphrase_active: false,
        };
        for (index, is_default) in updates {
            storage.address_metadata.store_one(&props, metadata(index, is_default)).unwrap();
        }
        storage.address_metadata.store_one(&props, metadata(chosen, true)).unwrap();

        let entries = storage.address_metadata.load(&props).unwrap();
        let defaults: Vec<_> = entries.iter().filter(|m| m.is_default).collect();
        prop_assert_eq!(defaults.len(), 1);
        prop_assert_eq!(defaults[0].index, chosen);
    }
}

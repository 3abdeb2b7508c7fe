//! Contacts storage
//!
//! Names are unique per wallet ignoring case, addresses are unique exactly.
//! Every check runs before the write, so a rejected contact leaves the
//! stored list untouched.

use crate::encrypted::{StatelessEncryptedStorage, StorageProps};
use crate::kv::KeyValueStore;
use crate::security::KdfParams;
use crate::{Error, Result};
use halcyon_core::{is_valid_address, Contact};
use std::sync::Arc;

/// Domain of contact entries
pub const CONTACTS_DOMAIN: &str = "contacts";

/// Maximum contact name length
pub const MAX_NAME_LENGTH: usize = 100;

/// Contacts store
pub struct ContactsStore {
    storage: StatelessEncryptedStorage<Vec<Contact>>,
}

impl ContactsStore {
    /// Store on top of `kv`
    pub fn new(kv: Arc<dyn KeyValueStore>, kdf: KdfParams) -> Self {
        Self {
            storage: StatelessEncryptedStorage::new(CONTACTS_DOMAIN, kv, kdf),
        }
    }

    /// All contacts of the wallet
    pub fn load(&self, props: &StorageProps<'_>) -> Result<Vec<Contact>> {
        self.storage.load(props)
    }

    /// Insert a contact, or replace the one with the same ID.
    ///
    /// Returns the stored contact with its ID assigned.
    pub fn store_one(&self, props: &StorageProps<'_>, contact: Contact) -> Result<Contact> {
        if props.passphrase_active {
            return Err(Error::PassphraseWallet(
                "Contacts cannot be saved".to_string(),
            ));
        }

        let mut contact = Contact {
            id: contact.id,
            name: contact.name.trim().to_string(),
            address: contact.address.trim().to_string(),
        };
        validate(&contact)?;

        let mut contacts = self.load(props)?;
        check_unique(&contacts, &contact)?;

        if contact.id.is_empty() {
            contact.id = uuid::Uuid::new_v4().to_string();
        }
        match contacts.iter_mut().find(|c| c.id == contact.id) {
            Some(existing) => *existing = contact.clone(),
            None => contacts.push(contact.clone()),
        }
        self.storage.store(&contacts, props)?;

        tracing::debug!("Stored contact {}", contact.id);
        Ok(contact)
    }

    /// Delete a contact by ID
    pub fn delete_one(&self, props: &StorageProps<'_>, id: &str) -> Result<()> {
        if props.passphrase_active {
            return Err(Error::PassphraseWallet(
                "Contacts cannot be deleted".to_string(),
            ));
        }
        let mut contacts = self.load(props)?;
        let before = contacts.len();
        contacts.retain(|c| c.id != id);
        if contacts.len() == before {
            return Err(Error::NotFound(format!("contact {}", id)));
        }
        self.storage.store(&contacts, props)
    }

    /// Remove every contact of a wallet
    pub fn delete(&self, wallet_id: &str) -> Result<()> {
        self.storage.delete(wallet_id)
    }
}

fn check_unique(contacts: &[Contact], contact: &Contact) -> Result<()> {
    let name = contact.name.to_lowercase();
    for other in contacts.iter().filter(|c| contact.id.is_empty() || c.id != contact.id) {
        if other.name.to_lowercase() == name {
            return Err(Error::ContactExists("name".to_string()));
        }
        if other.address == contact.address {
            return Err(Error::ContactExists("address".to_string()));
        }
    }
    Ok(())
}

fn validate(contact: &Contact) -> Result<()> {
    if contact.name.is_empty() {
        return Err(Error::Validation("Contact name cannot be empty".to_string()));
    }
    if contact.name.chars().count() > MAX_NAME_LENGTH {
        return Err(Error::Validation(format!(
            "Contact name too long (max {})",
            MAX_NAME_LENGTH
        )));
    }
    if !is_valid_address(&contact.address) {
        return Err(Error::Validation(format!(
            "Invalid address: {}",
            contact.address
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use halcyon_core::address_from_public_key;

    fn props(passphrase_active: bool) -> StorageProps<'static> {
        StorageProps {
            wallet_id: "w1",
            mnemonic: "test mnemonic",
            passphrase_active,
        }
    }

    fn contact(name: &str, seed: u8) -> Contact {
        Contact {
            id: String::new(),
            name: name.to_string(),
            address: address_from_public_key(&[seed; 33]),
        }
    }

    fn store() -> ContactsStore {
        ContactsStore::new(Arc::new(MemoryStore::new()), KdfParams::LIGHT)
    }

    #[test]
    fn test_store_assigns_id() {
        let store = store();
        let stored = store.store_one(&props(false), contact("Alice", 1)).unwrap();
        assert!(!stored.id.is_empty());
        assert_eq!(store.load(&props(false)).unwrap(), vec![stored]);
    }

    #[test]
    fn test_duplicates_rejected() {
        let store = store();
        store.store_one(&props(false), contact("Alice", 1)).unwrap();

        let err = store.store_one(&props(false), contact("ALICE", 2)).unwrap_err();
        assert!(matches!(err, Error::ContactExists(ref f) if f == "name"));

        let err = store.store_one(&props(false), contact("Bob", 1)).unwrap_err();
        assert!(matches!(err, Error::ContactExists(ref f) if f == "address"));

        assert_eq!(store.load(&props(false)).unwrap().len(), 1);
    }

    #[test]
    fn test_edit_keeps_own_name() {
        let store = store();
        let alice = store.store_one(&props(false), contact("Alice", 1)).unwrap();
        let edited = store
            .store_one(
                &props(false),
                Contact {
                    name: "alice".to_string(),
                    ..alice.clone()
                },
            )
            .unwrap();
        assert_eq!(edited.id, alice.id);
        let contacts = store.load(&props(false)).unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].name, "alice");
    }

    #[test]
    fn test_passphrase_wallet_rejected() {
        let store = store();
        assert!(matches!(
            store.store_one(&props(true), contact("Alice", 1)),
            Err(Error::PassphraseWallet(_))
        ));
    }

    #[test]
    fn test_invalid_address_rejected() {
        let store = store();
        let bad = Contact {
            id: String::new(),
            name: "Mallory".to_string(),
            address: "not-an-address".to_string(),
        };
        assert!(matches!(
            store.store_one(&props(false), bad),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_delete_one() {
        let store = store();
        let alice = store.store_one(&props(false), contact("Alice", 1)).unwrap();
        store.delete_one(&props(false), &alice.id).unwrap();
        assert!(store.load(&props(false)).unwrap().is_empty());
        assert!(matches!(
            store.delete_one(&props(false), &alice.id),
            Err(Error::NotFound(_))
        ));
    }
}

//! Address metadata storage
//!
//! Label, color and default flag of each derived address, keyed by
//! derivation index. At most one entry per wallet is marked default.

use crate::encrypted::{StatelessEncryptedStorage, StorageProps};
use crate::kv::KeyValueStore;
use crate::security::KdfParams;
use crate::{Error, Result};
use halcyon_core::{AddressMetadata, AddressSettings};
use std::sync::Arc;

/// Domain of address metadata entries
pub const ADDRESS_METADATA_DOMAIN: &str = "addresses-metadata";

/// Maximum label length
pub const MAX_LABEL_LENGTH: usize = 50;

/// Address metadata store
pub struct AddressMetadataStore {
    storage: StatelessEncryptedStorage<Vec<AddressMetadata>>,
}

impl AddressMetadataStore {
    /// Store on top of `kv`
    pub fn new(kv: Arc<dyn KeyValueStore>, kdf: KdfParams) -> Self {
        Self {
            storage: StatelessEncryptedStorage::new(ADDRESS_METADATA_DOMAIN, kv, kdf),
        }
    }

    /// Metadata of every address, ordered by index
    pub fn load(&self, props: &StorageProps<'_>) -> Result<Vec<AddressMetadata>> {
        let mut entries = self.storage.load(props)?;
        entries.sort_by_key(|m| m.index);
        Ok(entries)
    }

    /// Insert or replace the entry for `metadata.index`.
    ///
    /// When the entry is default, the previous default loses the flag.
    pub fn store_one(
        &self,
        props: &StorageProps<'_>,
        metadata: AddressMetadata,
    ) -> Result<Vec<AddressMetadata>> {
        self.store_many(props, vec![metadata])
    }

    /// Upsert several entries in one write
    pub fn store_many(
        &self,
        props: &StorageProps<'_>,
        batch: Vec<AddressMetadata>,
    ) -> Result<Vec<AddressMetadata>> {
        for metadata in &batch {
            validate_label(metadata.label.as_deref())?;
        }
        let mut entries = self.load(props)?;
        for metadata in batch {
            upsert(&mut entries, metadata);
        }
        self.storage.store(&entries, props)?;
        Ok(entries)
    }

    /// Replace the settings of the address at `index`
    pub fn update_settings(
        &self,
        props: &StorageProps<'_>,
        index: u32,
        settings: AddressSettings,
    ) -> Result<Vec<AddressMetadata>> {
        self.store_one(props, AddressMetadata::new(index, settings))
    }

    /// Index of the default address
    pub fn default_index(&self, props: &StorageProps<'_>) -> Result<Option<u32>> {
        Ok(self.load(props)?.iter().find(|m| m.is_default).map(|m| m.index))
    }

    /// Remove every entry of a wallet
    pub fn delete(&self, wallet_id: &str) -> Result<()> {
        self.storage.delete(wallet_id)
    }
}

fn validate_label(label: Option<&str>) -> Result<()> {
    if let Some(label) = label {
        if label.chars().count() > MAX_LABEL_LENGTH {
            return Err(Error::Validation(format!(
                "Label too long (max {})",
                MAX_LABEL_LENGTH
            )));
        }
    }
    Ok(())
}

fn upsert(entries: &mut Vec<AddressMetadata>, metadata: AddressMetadata) {
    if metadata.is_default {
        for entry in entries.iter_mut() {
            entry.is_default = false;
        }
    }
    match entries.iter_mut().find(|m| m.index == metadata.index) {
        Some(existing) => *existing = metadata,
        None => entries.push(metadata),
    }
    entries.sort_by_key(|m| m.index);
}

//! Mnemonic handling and address derivation
//!
//! Key material never leaves this module except as the derived public
//! address data. Seeds are wrapped in [`Zeroizing`] and wiped on drop.

use crate::address::{address_from_public_key, group_of_hash};
use crate::{Error, Result};
use bip32::{DerivationPath, XPrv};
use bip39::{Language, Mnemonic};
use halcyon_params::{COIN_TYPE, TOTAL_NUMBER_OF_GROUPS};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Upper bound on indexes probed when looking for an address in a group
const MAX_GROUP_SEARCH: u32 = 1_000;

/// BIP-39 seed (64 bytes), zeroized on drop
pub struct Seed(Zeroizing<[u8; 64]>);

impl Seed {
    /// Derive the seed from a mnemonic and optional passphrase
    pub fn from_mnemonic(mnemonic: &str, passphrase: &str) -> Result<Self> {
        let mnemonic = Mnemonic::parse_in_normalized(Language::English, mnemonic)
            .map_err(|e| Error::InvalidMnemonic(e.to_string()))?;
        Ok(Self(Zeroizing::new(mnemonic.to_seed(passphrase))))
    }

    /// Seed bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0[..]
    }
}

/// Derive the BIP-39 seed for a wallet, see [`Seed::from_mnemonic`]
pub fn seed_from_mnemonic(mnemonic: &str, passphrase: Option<&str>) -> Result<Seed> {
    Seed::from_mnemonic(mnemonic, passphrase.unwrap_or(""))
}

/// Generate new random mnemonic
///
/// `word_count` is 12, 18 or 24; anything else falls back to 24 words.
pub fn generate_mnemonic(word_count: Option<u32>) -> Result<String> {
    let entropy_size = match word_count.unwrap_or(24) {
        12 => 16,
        18 => 24,
        _ => 32,
    };

    let mut entropy = Zeroizing::new(vec![0u8; entropy_size]);
    rand::thread_rng().fill_bytes(&mut entropy);

    let mnemonic =
        Mnemonic::from_entropy(&entropy).map_err(|e| Error::KeyDerivation(e.to_string()))?;
    Ok(mnemonic.to_string())
}

/// Validate a mnemonic phrase (word list and checksum)
pub fn validate_mnemonic(mnemonic: &str) -> Result<()> {
    Mnemonic::parse_in_normalized(Language::English, mnemonic)
        .map(|_| ())
        .map_err(|e| Error::InvalidMnemonic(e.to_string()))
}

/// Public data of an address derived at an index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedAddress {
    /// Address string
    pub hash: String,
    /// Compressed public key, hex
    pub public_key: String,
    /// Derivation index
    pub index: u32,
    /// Address group
    pub group: u32,
}

/// Derives addresses from a wallet seed
pub trait AddressDeriver: Send + Sync {
    /// Derive the address at `index`
    fn derive(&self, seed: &Seed, index: u32) -> Result<DerivedAddress>;
}

/// BIP-32 derivation along `m/44'/COIN_TYPE'/0'/0/index`
#[derive(Debug, Clone, Copy, Default)]
pub struct Bip32Deriver;

impl Bip32Deriver {
    /// Derivation path for an address index
    pub fn path(index: u32) -> String {
        format!("m/44'/{}'/0'/0/{}", COIN_TYPE, index)
    }
}

impl AddressDeriver for Bip32Deriver {
    fn derive(&self, seed: &Seed, index: u32) -> Result<DerivedAddress> {
        let path: DerivationPath = Self::path(index)
            .parse()
            .map_err(|e: bip32::Error| Error::KeyDerivation(e.to_string()))?;
        let xprv = XPrv::derive_from_path(seed.as_bytes(), &path)
            .map_err(|e| Error::KeyDerivation(e.to_string()))?;
        let public_key = xprv.public_key().to_bytes();
        let hash = address_from_public_key(&public_key);
        let group = group_of_hash(&crate::address::blake2b_256(&public_key));

        Ok(DerivedAddress {
            hash,
            public_key: hex::encode(public_key),
            index,
            group,
        })
    }
}

/// Derive the next free address, optionally constrained to a group.
///
/// Starts at index 0 and skips indexes already in use by the wallet.
pub fn derive_new_address(
    deriver: &dyn AddressDeriver,
    seed: &Seed,
    group: Option<u32>,
    skip_indexes: &[u32],
) -> Result<DerivedAddress> {
    if let Some(group) = group {
        if group >= TOTAL_NUMBER_OF_GROUPS {
            return Err(Error::Validation(format!("Invalid group {}", group)));
        }
    }

    let mut index = 0u32;
    let mut probed = 0u32;
    loop {
        if skip_indexes.contains(&index) {
            index = index
                .checked_add(1)
                .ok_or_else(|| Error::KeyDerivation("Index space exhausted".to_string()))?;
            continue;
        }

        let derived = deriver.derive(seed, index)?;
        if group.map_or(true, |g| derived.group == g) {
            tracing::debug!("Derived address at index {} (group {})", index, derived.group);
            return Ok(derived);
        }

        probed += 1;
        if probed >= MAX_GROUP_SEARCH {
            return Err(Error::KeyDerivation(format!(
                "No address found in group {:?} after {} attempts",
                group, probed
            )));
        }
        index = index
            .checked_add(1)
            .ok_or_else(|| Error::KeyDerivation("Index space exhausted".to_string()))?;
    }
}

//! Address encoding, validation and group assignment
//!
//! An address is the base58 encoding of a one-byte lockup type followed by
//! the lockup payload. For the common P2PKH type the payload is the
//! blake2b-256 hash of the compressed public key.

use crate::{Error, Result};
use halcyon_params::TOTAL_NUMBER_OF_GROUPS;

/// Length of a blake2b-256 hash
pub const HASH_LENGTH: usize = 32;

/// Lockup script type encoded in the first address byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressType {
    /// Pay to public key hash
    P2pkh,
    /// Pay to multiple public key hashes
    P2mpkh,
    /// Pay to script hash
    P2sh,
    /// Pay to contract
    P2c,
}

impl AddressType {
    fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Self::P2pkh),
            0x01 => Some(Self::P2mpkh),
            0x02 => Some(Self::P2sh),
            0x03 => Some(Self::P2c),
            _ => None,
        }
    }

    fn as_byte(&self) -> u8 {
        match self {
            Self::P2pkh => 0x00,
            Self::P2mpkh => 0x01,
            Self::P2sh => 0x02,
            Self::P2c => 0x03,
        }
    }
}

/// blake2b-256 of arbitrary bytes
pub fn blake2b_256(data: &[u8]) -> [u8; HASH_LENGTH] {
    let hash = blake2b_simd::Params::new()
        .hash_length(HASH_LENGTH)
        .hash(data);
    let mut out = [0u8; HASH_LENGTH];
    out.copy_from_slice(hash.as_bytes());
    out
}

/// Encode the P2PKH address of a compressed public key
pub fn address_from_public_key(public_key: &[u8]) -> String {
    let mut bytes = Vec::with_capacity(1 + HASH_LENGTH);
    bytes.push(AddressType::P2pkh.as_byte());
    bytes.extend_from_slice(&blake2b_256(public_key));
    bs58::encode(bytes).into_string()
}

fn decode(address: &str) -> Result<(AddressType, Vec<u8>)> {
    if address.is_empty() {
        return Err(Error::InvalidAddress("Address is empty".to_string()));
    }
    let bytes = bs58::decode(address)
        .into_vec()
        .map_err(|e| Error::InvalidAddress(format!("Not base58: {}", e)))?;
    let (&type_byte, payload) = bytes
        .split_first()
        .ok_or_else(|| Error::InvalidAddress("Address is empty".to_string()))?;
    let address_type = AddressType::from_byte(type_byte)
        .ok_or_else(|| Error::InvalidAddress(format!("Unknown address type {}", type_byte)))?;

    let valid_length = match address_type {
        AddressType::P2pkh | AddressType::P2sh | AddressType::P2c => payload.len() == HASH_LENGTH,
        // [n][n * pubkey hash][m]
        AddressType::P2mpkh => payload.len() >= HASH_LENGTH + 2,
    };
    if !valid_length {
        return Err(Error::InvalidAddress(format!(
            "Invalid payload length {} for {:?}",
            payload.len(),
            address_type
        )));
    }

    Ok((address_type, payload.to_vec()))
}

/// Check an address string
pub fn is_valid_address(address: &str) -> bool {
    decode(address).is_ok()
}

/// Type of an address
pub fn address_type(address: &str) -> Result<AddressType> {
    decode(address).map(|(t, _)| t)
}

/// Group (shard) an address belongs to
pub fn address_group(address: &str) -> Result<u32> {
    let (address_type, payload) = decode(address)?;
    let hint_bytes = match address_type {
        AddressType::P2mpkh => &payload[1..1 + HASH_LENGTH],
        _ => &payload[..HASH_LENGTH],
    };
    Ok(group_of_hash(hint_bytes))
}

/// Group of a lockup hash: djb hash of the bytes, forced odd, folded to one
/// byte by xor, modulo the group count.
pub fn group_of_hash(bytes: &[u8]) -> u32 {
    let hint = djb_int_hash(bytes) | 1;
    let folded = hint.to_be_bytes().iter().fold(0u8, |acc, b| acc ^ b);
    u32::from(folded) % TOTAL_NUMBER_OF_GROUPS
}

fn djb_int_hash(bytes: &[u8]) -> i32 {
    bytes.iter().fold(5381i32, |hash, &b| {
        hash.wrapping_shl(5)
            .wrapping_add(hash)
            .wrapping_add(i32::from(b))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_key_address_roundtrip() {
        let public_key = [2u8; 33];
        let address = address_from_public_key(&public_key);
        assert!(is_valid_address(&address));
        assert_eq!(address_type(&address).unwrap(), AddressType::P2pkh);
        assert!(address_group(&address).unwrap() < TOTAL_NUMBER_OF_GROUPS);
    }

    #[test]
    fn test_invalid_addresses() {
        assert!(!is_valid_address(""));
        assert!(!is_valid_address("0OIl"));
        // valid base58 but wrong length
        assert!(!is_valid_address(&bs58::encode([0u8, 1, 2, 3]).into_string()));
        // unknown type byte
        let mut bytes = vec![9u8];
        bytes.extend_from_slice(&[1u8; 32]);
        assert!(!is_valid_address(&bs58::encode(bytes).into_string()));
    }

    #[test]
    fn test_group_is_stable() {
        let hash = blake2b_256(b"halcyon");
        assert_eq!(group_of_hash(&hash), group_of_hash(&hash));
    }

    #[test]
    fn test_djb_hash_matches_reference() {
        // 5381 * 33 + 'a'
        assert_eq!(djb_int_hash(b"a"), 177_670);
        assert_eq!(djb_int_hash(b""), 5381);
    }
}

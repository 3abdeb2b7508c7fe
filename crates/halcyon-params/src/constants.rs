//! Chain-wide constants

use crate::{Error, Result};

/// Page size used for every paginated explorer request.
pub const PAGE_LIMIT: usize = 20;

/// Number of address groups (shards) on the chain
pub const TOTAL_NUMBER_OF_GROUPS: u32 = 4;

/// Decimals of the native coin (1 coin = 10^18 base units)
pub const NATIVE_DECIMALS: u32 = 18;

/// BIP-44 coin type used for address derivation
pub const COIN_TYPE: u32 = 1234;

/// Consecutive unused addresses (per group) that end a discovery scan
pub const ADDRESS_DISCOVERY_GAP: u32 = 5;

/// Minimum wallet password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Validate an address group index
pub fn check_group(group: u32) -> Result<u32> {
    if group >= TOTAL_NUMBER_OF_GROUPS {
        return Err(Error::InvalidGroup(group));
    }
    Ok(group)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_group() {
        assert_eq!(check_group(0).unwrap(), 0);
        assert_eq!(check_group(TOTAL_NUMBER_OF_GROUPS - 1).unwrap(), 3);
        assert!(check_group(TOTAL_NUMBER_OF_GROUPS).is_err());
    }
}

//! Property-based tests for halcyon-core
//!
//! Uses proptest to verify amount formatting and address invariants

use halcyon_core::{
    abbreviate_amount, address_from_public_key, address_group, format_full, is_valid_address,
    parse_amount, remove_trailing_zeros,
};
use halcyon_params::{NATIVE_DECIMALS, TOTAL_NUMBER_OF_GROUPS};
use proptest::prelude::*;

const COIN: u128 = 1_000_000_000_000_000_000;

// ============================================================================
// Strategies
// ============================================================================

/// Amounts from one base unit up to a quadrillion coins
fn amount_strategy() -> impl Strategy<Value = u128> {
    1u128..=(1_000_000_000_000_000 * COIN)
}

/// Decimal strings with up to 18 fraction digits
fn decimal_string_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[0-9]{1,12}\\.[0-9]{1,18}").unwrap()
}

// ============================================================================
// Amount Properties
// ============================================================================

proptest! {
    /// Property: trimming an abbreviated amount changes nothing
    #[test]
    fn prop_remove_trailing_zeros_stable_on_abbreviated(amount in amount_strategy()) {
        let abbreviated = abbreviate_amount(amount);
        prop_assert_eq!(remove_trailing_zeros(&abbreviated), abbreviated);
    }

    /// Property: trimming is idempotent
    #[test]
    fn prop_remove_trailing_zeros_idempotent(value in decimal_string_strategy()) {
        let once = remove_trailing_zeros(&value);
        prop_assert_eq!(remove_trailing_zeros(&once), once.clone());
        // at least two decimals are kept
        let decimals = once.split_once('.').map(|(_, f)| f.len()).unwrap_or(0);
        prop_assert!(decimals >= 2);
    }

    /// Property: full-precision rendering parses back to the same amount
    #[test]
    fn prop_format_full_parses_back(amount in amount_strategy()) {
        let rendered = format_full(amount, NATIVE_DECIMALS);
        prop_assert_eq!(parse_amount(&rendered, NATIVE_DECIMALS).unwrap(), amount);
    }

    /// Property: abbreviated amounts carry a known suffix or none
    #[test]
    fn prop_abbreviation_suffix(amount in amount_strategy()) {
        let abbreviated = abbreviate_amount(amount);
        let last = abbreviated.chars().last().unwrap();
        prop_assert!(last.is_ascii_digit() || "KMBT".contains(last));
        if amount >= 1000 * COIN {
            prop_assert!(!last.is_ascii_digit());
        }
    }
}

// ============================================================================
// Address Properties
// ============================================================================

proptest! {
    /// Property: every public key produces a valid address in a valid group
    #[test]
    fn prop_address_from_any_public_key(key in prop::collection::vec(any::<u8>(), 33)) {
        let address = address_from_public_key(&key);
        prop_assert!(is_valid_address(&address));
        prop_assert!(address_group(&address).unwrap() < TOTAL_NUMBER_OF_GROUPS);
    }
}

#[test]
fn test_reference_examples() {
    assert_eq!(abbreviate_amount(1230 * COIN), "1.230K");
    assert_eq!(abbreviate_amount(0), "0.00");
    assert_eq!(remove_trailing_zeros("0.00010000"), "0.0001");
}

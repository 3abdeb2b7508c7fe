//! Amount formatting and parsing
//!
//! Amounts are integers in base units (10^18 per coin for the native token).
//! Display strings are produced with exact integer arithmetic; no floating
//! point is involved.

use crate::{Error, Result};
use halcyon_params::NATIVE_DECIMALS;

/// Suffixes per thousands tier
pub const MONEY_SYMBOLS: [&str; 5] = ["", "K", "M", "B", "T"];

/// Default number of decimals shown by [`abbreviate_amount`]
pub const DEFAULT_FRACTION_DIGITS: u32 = 3;

/// Minimum decimals kept by [`remove_trailing_zeros`]
pub const MIN_DISPLAYED_DECIMALS: usize = 2;

/// Formatting options for [`abbreviate_amount_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountFormat {
    /// Decimals of the token being formatted
    pub decimals: u32,
    /// Show every significant decimal instead of abbreviating
    pub full_precision: bool,
    /// Decimals shown for rounded output
    pub fraction_digits: u32,
}

impl Default for AmountFormat {
    fn default() -> Self {
        Self {
            decimals: NATIVE_DECIMALS,
            full_precision: false,
            fraction_digits: DEFAULT_FRACTION_DIGITS,
        }
    }
}

impl AmountFormat {
    /// Format for a token with the given decimals
    pub fn for_token(decimals: u32) -> Self {
        Self {
            decimals,
            ..Self::default()
        }
    }
}

/// Abbreviate a native-coin amount for display: `1230 * 10^18` becomes
/// `"1.230K"`, zero becomes `"0.00"`.
pub fn abbreviate_amount(base: u128) -> String {
    abbreviate_amount_with(base, &AmountFormat::default())
}

/// Abbreviate an amount with explicit formatting options.
///
/// Amounts under one thousandth are shown at full precision, amounts under
/// 1000 are rounded to `fraction_digits` decimals with trailing zeros
/// removed, larger amounts are scaled to the `K`/`M`/`B`/`T` tiers and keep
/// exactly `fraction_digits` decimals.
pub fn abbreviate_amount_with(base: u128, format: &AmountFormat) -> String {
    if base == 0 {
        return format!("0.{}", "0".repeat(MIN_DISPLAYED_DECIMALS));
    }

    let Some(unit) = 10u128.checked_pow(format.decimals) else {
        return remove_trailing_zeros(&format_full(base, format.decimals));
    };

    if format.full_precision || base.saturating_mul(1000) < unit {
        return remove_trailing_zeros(&format_full(base, format.decimals));
    }

    let whole = base / unit;
    let mut tier = 0usize;
    let mut rest = whole;
    while rest >= 1000
        && tier < MONEY_SYMBOLS.len() - 1
        && 10u128
            .checked_pow(format.decimals + 3 * (tier as u32 + 1))
            .is_some()
    {
        rest /= 1000;
        tier += 1;
    }

    if tier == 0 {
        return remove_trailing_zeros(&round_to(base, format.decimals, format.fraction_digits));
    }

    let scale = format.decimals + 3 * tier as u32;
    format!(
        "{}{}",
        round_to(base, scale, format.fraction_digits),
        MONEY_SYMBOLS[tier]
    )
}

/// Render `base / 10^decimals` with every decimal digit.
pub fn format_full(base: u128, decimals: u32) -> String {
    if decimals == 0 {
        return base.to_string();
    }
    let digits = base.to_string();
    let decimals = decimals as usize;
    if digits.len() <= decimals {
        format!("0.{}{}", "0".repeat(decimals - digits.len()), digits)
    } else {
        let (int_part, frac_part) = digits.split_at(digits.len() - decimals);
        format!("{}.{}", int_part, frac_part)
    }
}

/// Round `base / 10^decimals` half-up to `digits` decimals.
fn round_to(base: u128, decimals: u32, digits: u32) -> String {
    if decimals <= digits {
        let full = format_full(base, decimals);
        let pad = (digits - decimals) as usize;
        return match (decimals, pad) {
            (_, 0) => full,
            (0, _) => format!("{}.{}", full, "0".repeat(pad)),
            _ => format!("{}{}", full, "0".repeat(pad)),
        };
    }

    // callers only pass scales whose power of ten fits in u128
    let divisor = 10u128.pow(decimals - digits);
    let rounded = base / divisor + u128::from(base % divisor >= divisor / 2);
    format_full(rounded, digits)
}

/// Strip trailing zeros from a decimal string, keeping at least two
/// decimals: `"0.00010000"` becomes `"0.0001"`, `"1.500"` becomes `"1.50"`.
///
/// Strings without a decimal point or with a unit suffix are returned as is.
pub fn remove_trailing_zeros(value: &str) -> String {
    remove_trailing_zeros_with_min(value, MIN_DISPLAYED_DECIMALS)
}

/// [`remove_trailing_zeros`] with an explicit minimum number of decimals
pub fn remove_trailing_zeros_with_min(value: &str, min_decimals: usize) -> String {
    let ends_with_digit = value.chars().last().is_some_and(|c| c.is_ascii_digit());
    let Some((int_part, frac_part)) = value.split_once('.') else {
        return value.to_string();
    };
    if !ends_with_digit {
        return value.to_string();
    }

    let trimmed = frac_part.trim_end_matches('0');
    if trimmed.is_empty() && min_decimals == 0 {
        int_part.to_string()
    } else if trimmed.len() >= min_decimals {
        format!("{}.{}", int_part, trimmed)
    } else {
        format!("{}.{:0<width$}", int_part, trimmed, width = min_decimals)
    }
}

/// Parse a user-entered decimal amount into base units.
pub fn parse_amount(input: &str, decimals: u32) -> Result<u128> {
    let input = input.trim();
    if input.is_empty() {
        return Err(Error::InvalidAmount("Amount is empty".to_string()));
    }

    let (int_part, frac_part) = match input.split_once('.') {
        Some((i, f)) => (i, f),
        None => (input, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(Error::InvalidAmount(format!("'{}' is not a number", input)));
    }
    if !int_part.chars().all(|c| c.is_ascii_digit()) || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(Error::InvalidAmount(format!("'{}' is not a number", input)));
    }
    if frac_part.len() > decimals as usize {
        return Err(Error::InvalidAmount(format!(
            "At most {} decimals are allowed",
            decimals
        )));
    }

    let unit = 10u128
        .checked_pow(decimals)
        .ok_or_else(|| Error::AmountOverflow(format!("{} decimals", decimals)))?;
    let whole: u128 = if int_part.is_empty() {
        0
    } else {
        int_part
            .parse()
            .map_err(|_| Error::AmountOverflow(input.to_string()))?
    };
    let frac: u128 = if frac_part.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", frac_part, width = decimals as usize);
        padded
            .parse()
            .map_err(|_| Error::AmountOverflow(input.to_string()))?
    };

    whole
        .checked_mul(unit)
        .and_then(|w| w.checked_add(frac))
        .ok_or_else(|| Error::AmountOverflow(input.to_string()))
}

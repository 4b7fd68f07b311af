//! Decimal-string / smallest-unit conversion.
//!
//! ERC-20 amounts cross the wire as integers in the token's smallest
//! unit; users see decimal strings. Both directions live here so the
//! rounding rules stay in one place: excess fractional digits are
//! truncated, never rounded up.

use alloy::primitives::U256;
use thiserror::Error;

/// Errors from parsing a user-supplied amount string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnitsError {
    #[error("Amount is empty")]
    Empty,

    #[error("Amount '{0}' is not a decimal number")]
    Malformed(String),

    #[error("Amount overflows the token's integer range")]
    Overflow,
}

/// Convert a decimal string to the token's smallest unit.
///
/// Fractional digits beyond `decimals` are truncated. Whitespace is
/// trimmed; signs, exponents and grouping are rejected.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, UnitsError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(UnitsError::Empty);
    }

    let (int_part, frac_part) = match amount.split_once('.') {
        Some((i, f)) => (i, f),
        None => (amount, ""),
    };

    let digits_only = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !digits_only(int_part) || !digits_only(frac_part) {
        return Err(UnitsError::Malformed(amount.to_string()));
    }
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(UnitsError::Malformed(amount.to_string()));
    }

    let scale = pow10(decimals);

    let int_value = if int_part.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(int_part, 10).map_err(|_| UnitsError::Overflow)?
    };

    // Truncate to at most `decimals` fractional digits, then pad.
    let frac_trimmed: String = frac_part.chars().take(decimals as usize).collect();
    let frac_value = if frac_trimmed.is_empty() {
        U256::ZERO
    } else {
        let padded = format!("{:0<width$}", frac_trimmed, width = decimals as usize);
        U256::from_str_radix(&padded, 10).map_err(|_| UnitsError::Overflow)?
    };

    int_value
        .checked_mul(scale)
        .and_then(|v| v.checked_add(frac_value))
        .ok_or(UnitsError::Overflow)
}

/// Render a smallest-unit value as a human-readable decimal string.
///
/// Trailing fractional zeros are trimmed; a whole number renders with
/// no decimal point.
pub fn format_units(value: U256, decimals: u8) -> String {
    if decimals == 0 {
        return value.to_string();
    }
    let scale = pow10(decimals);
    let int_part = value / scale;
    let frac_part = value % scale;

    if frac_part.is_zero() {
        return int_part.to_string();
    }

    let frac_str = format!("{:0>width$}", frac_part, width = decimals as usize);
    let frac_str = frac_str.trim_end_matches('0');
    format!("{}.{}", int_part, frac_str)
}

fn pow10(decimals: u8) -> U256 {
    U256::from(10u64).pow(U256::from(decimals))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whole_number() {
        assert_eq!(parse_units("5", 6).unwrap(), U256::from(5_000_000u64));
        assert_eq!(parse_units("0", 6).unwrap(), U256::ZERO);
    }

    #[test]
    fn test_parse_fractional() {
        assert_eq!(parse_units("1.5", 6).unwrap(), U256::from(1_500_000u64));
        assert_eq!(parse_units("0.000001", 6).unwrap(), U256::from(1u64));
        assert_eq!(parse_units(".5", 6).unwrap(), U256::from(500_000u64));
    }

    #[test]
    fn test_parse_truncates_excess_digits() {
        // 7th fractional digit is dropped, not rounded
        assert_eq!(
            parse_units("1.2345678", 6).unwrap(),
            U256::from(1_234_567u64)
        );
        assert_eq!(parse_units("0.9999999", 6).unwrap(), U256::from(999_999u64));
    }

    #[test]
    fn test_parse_zero_decimals() {
        assert_eq!(parse_units("42", 0).unwrap(), U256::from(42u64));
        // Fraction truncates away entirely
        assert_eq!(parse_units("42.9", 0).unwrap(), U256::from(42u64));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_units("", 6), Err(UnitsError::Empty));
        assert_eq!(parse_units("   ", 6), Err(UnitsError::Empty));
        assert!(matches!(parse_units("abc", 6), Err(UnitsError::Malformed(_))));
        assert!(matches!(parse_units("1.2.3", 6), Err(UnitsError::Malformed(_))));
        assert!(matches!(parse_units("-1", 6), Err(UnitsError::Malformed(_))));
        assert!(matches!(parse_units("1e6", 6), Err(UnitsError::Malformed(_))));
        assert!(matches!(parse_units(".", 6), Err(UnitsError::Malformed(_))));
    }

    #[test]
    fn test_parse_large_amount() {
        // 10^30 fits comfortably in U256
        let big = "1000000000000000000000000000000";
        let parsed = parse_units(big, 18).unwrap();
        assert_eq!(
            parsed,
            U256::from_str_radix(big, 10).unwrap() * U256::from(10u64).pow(U256::from(18))
        );
    }

    #[test]
    fn test_format_basic() {
        assert_eq!(format_units(U256::from(1_500_000u64), 6), "1.5");
        assert_eq!(format_units(U256::from(5_000_000u64), 6), "5");
        assert_eq!(format_units(U256::from(1u64), 6), "0.000001");
        assert_eq!(format_units(U256::ZERO, 6), "0");
    }

    #[test]
    fn test_format_zero_decimals() {
        assert_eq!(format_units(U256::from(42u64), 0), "42");
    }

    #[test]
    fn test_round_trip_preserves_value() {
        let value = U256::from(123_456_789u64);
        let rendered = format_units(value, 6);
        assert_eq!(parse_units(&rendered, 6).unwrap(), value);
    }
}

//! Amount formatting for on-screen display.
//!
//! Exports always use plain literals (see [`super::csv`]); this is the
//! human-facing variant with thousands separators.

use rust_decimal::{Decimal, RoundingStrategy};

/// Maximum fraction digits shown, matching `en-US` locale defaults.
const MAX_FRACTION_DIGITS: u32 = 3;

/// Format an amount with comma thousands separators (e.g. `1,234.5`).
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(MAX_FRACTION_DIGITS, RoundingStrategy::MidpointAwayFromZero)
        .normalize();

    let s = rounded.abs().to_string();
    let (integer_part, fraction_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s.as_str(), None),
    };

    let mut formatted = String::new();
    if rounded.is_sign_negative() && !rounded.is_zero() {
        formatted.push('-');
    }

    // Add thousand separators
    let chars: Vec<char> = integer_part.chars().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(*c);
    }

    if let Some(fraction) = fraction_part {
        formatted.push('.');
        formatted.push_str(fraction);
    }

    formatted
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn fmt(s: &str) -> String {
        format_amount(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(fmt("0"), "0");
        assert_eq!(fmt("150"), "150");
        assert_eq!(fmt("1234.5"), "1,234.5");
        assert_eq!(fmt("1234.50"), "1,234.5");
        assert_eq!(fmt("12345678.90"), "12,345,678.9");
        assert_eq!(fmt("100000"), "100,000");
    }

    #[test]
    fn test_format_amount_rounds_to_three_digits() {
        assert_eq!(fmt("0.12345"), "0.123");
        assert_eq!(fmt("2.0005"), "2.001");
    }

    #[test]
    fn test_format_negative_amount() {
        assert_eq!(fmt("-1234.5"), "-1,234.5");
        assert_eq!(fmt("-0.0001"), "0");
    }
}

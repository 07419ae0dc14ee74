//! Keystroke sanitisation for amount and rate fields.
//!
//! These helpers turn whatever the user typed into something parseable and
//! into a live display string. They never fail; garbage in yields an empty or
//! unchanged string out.

use crate::currency::{CurrencyDescriptor, NumberingScheme};
use crate::format::group_digits;

/// Keep only ASCII digits, e.g. `"₹1,00,000"` → `"100000"`.
pub fn raw_digits(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Keep ASCII digits and decimal points, dropping separators and symbols.
pub fn strip_formatting(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

/// Re-group an amount field as the user types.
///
/// Returns an empty string when there are no digits. If the digits do not fit
/// in an `i64` the input is handed back untouched. Ungrouped currencies get the
/// bare digit string, leading zeros included.
pub fn format_live_input(input: &str, currency: &CurrencyDescriptor) -> String {
    let digits = raw_digits(input);
    if digits.is_empty() {
        return String::new();
    }
    let Ok(number) = digits.parse::<i64>() else {
        return input.to_string();
    };

    match currency.scheme {
        NumberingScheme::Ungrouped => digits,
        scheme => group_digits(&number.to_string(), scheme),
    }
}

/// Clean a rate field: digits and at most one decimal point.
///
/// Extra points are collapsed rather than rejected, so `"1.2.3"` becomes
/// `"1.23"`.
pub fn sanitize_decimal_input(input: &str) -> String {
    let filtered = strip_formatting(input);
    let mut parts = filtered.split('.');
    let whole = parts.next().unwrap_or_default();
    let rest: Vec<&str> = parts.collect();

    if rest.len() > 1 {
        format!("{}.{}", whole, rest.concat())
    } else {
        filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::{INR, USD};
    use pretty_assertions::assert_eq;

    const PLAIN: CurrencyDescriptor = CurrencyDescriptor {
        code: "XTS",
        name: "Test Units",
        symbol: "¤",
        scheme: NumberingScheme::Ungrouped,
    };

    #[test]
    fn test_raw_digits() {
        assert_eq!(raw_digits("₹1,00,000"), "100000");
        assert_eq!(raw_digits("12.50"), "1250");
        assert_eq!(raw_digits("abc"), "");
        assert_eq!(raw_digits("٣"), "");
    }

    #[test]
    fn test_strip_formatting() {
        assert_eq!(strip_formatting("$1,234.56"), "1234.56");
        assert_eq!(strip_formatting(""), "");
    }

    #[test]
    fn test_live_input_grouping() {
        assert_eq!(format_live_input("1234567", &INR), "12,34,567");
        assert_eq!(format_live_input("1234567", &USD), "1,234,567");
        assert_eq!(format_live_input("12,34,5678", &INR), "1,23,45,678");
    }

    #[test]
    fn test_live_input_drops_leading_zeros_when_grouped() {
        assert_eq!(format_live_input("0012000", &USD), "12,000");
        assert_eq!(format_live_input("0012000", &PLAIN), "0012000");
    }

    #[test]
    fn test_live_input_empty_and_non_numeric() {
        assert_eq!(format_live_input("", &INR), "");
        assert_eq!(format_live_input("abc", &INR), "");
    }

    #[test]
    fn test_live_input_overflow_returns_input() {
        let huge = "99999999999999999999999";
        assert_eq!(format_live_input(huge, &USD), huge);
    }

    #[test]
    fn test_live_input_cutoff_is_i64_max() {
        assert_eq!(
            format_live_input("9223372036854775807", &USD),
            "9,223,372,036,854,775,807"
        );
        let past_max = "9223372036854775808";
        assert_eq!(format_live_input(past_max, &USD), past_max);
    }

    #[test]
    fn test_decimal_input_single_point() {
        assert_eq!(sanitize_decimal_input("8.5"), "8.5");
        assert_eq!(sanitize_decimal_input("8.5%"), "8.5");
        assert_eq!(sanitize_decimal_input(".75"), ".75");
        assert_eq!(sanitize_decimal_input("12."), "12.");
        assert_eq!(sanitize_decimal_input(""), "");
    }

    #[test]
    fn test_decimal_input_collapses_extra_points() {
        assert_eq!(sanitize_decimal_input("1.2.3"), "1.23");
        assert_eq!(sanitize_decimal_input("10..5"), "10.5");
        assert_eq!(sanitize_decimal_input("a1.b2.c3.4"), "1.234");
    }
}

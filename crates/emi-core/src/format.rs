//! Region-aware amount formatting.
//!
//! Three renderings are offered for every [`CurrencyDescriptor`]:
//!
//! * [`format_currency`]: symbol plus the fully grouped amount with two
//!   decimals (`₹1,23,45,678.90`, `$12,345,678.90`).
//! * [`format_amount`]: magnitude-abbreviated amount without symbol, at a
//!   caller-chosen precision (`12.50 L`, `1.25 M`).
//! * [`format_compact`]: the tight form used in schedule table cells
//!   (`12.5L`, `950`).
//!
//! All functions are total: any `Decimal` produces a string.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::currency::{CurrencyDescriptor, NumberingScheme};
use crate::types::Money;

/// Fraction digits used by [`format_currency`] and by ungrouped currencies.
pub const CURRENCY_FRACTION_DIGITS: u32 = 2;

/// Fraction digits used by [`format_compact`] for abbreviated values.
pub const COMPACT_FRACTION_DIGITS: u32 = 1;

/// Largest scale a `Decimal` can carry.
const MAX_FRACTION_DIGITS: u32 = 28;

const INDIAN_MAGNITUDES: [(Decimal, &str); 3] = [
    (dec!(10_000_000), "Cr"),
    (dec!(100_000), "L"),
    (dec!(1_000), "K"),
];

const WESTERN_MAGNITUDES: [(Decimal, &str); 3] = [
    (dec!(1_000_000_000), "B"),
    (dec!(1_000_000), "M"),
    (dec!(1_000), "K"),
];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Symbol-prefixed amount with two decimals, grouped per the currency's scheme.
///
/// Grouped schemes round half to even; the ungrouped scheme rounds half away
/// from zero. The symbol always comes first, so negatives read `₹-1,000.00`.
pub fn format_currency(amount: Money, currency: &CurrencyDescriptor) -> String {
    let number = match currency.scheme {
        NumberingScheme::Indian | NumberingScheme::Western => grouped(
            amount,
            currency.scheme,
            CURRENCY_FRACTION_DIGITS,
            RoundingStrategy::MidpointNearestEven,
        ),
        NumberingScheme::Ungrouped => fixed(
            amount,
            CURRENCY_FRACTION_DIGITS,
            RoundingStrategy::MidpointAwayFromZero,
        ),
    };
    format!("{}{}", currency.symbol, number)
}

/// Magnitude-abbreviated amount (`12.50 L`, `1.25 M`) without a symbol.
///
/// `precision` sets the fraction digits of both abbreviated and plain values.
/// Ungrouped currencies are never abbreviated and always show two decimals.
pub fn format_amount(amount: Money, currency: &CurrencyDescriptor, precision: u32) -> String {
    let precision = precision.min(MAX_FRACTION_DIGITS);
    match currency.scheme {
        NumberingScheme::Ungrouped => fixed(
            amount,
            CURRENCY_FRACTION_DIGITS,
            RoundingStrategy::MidpointAwayFromZero,
        ),
        scheme => abbreviate(amount, scheme, precision, " ", precision),
    }
}

/// Table-cell form: one decimal, no space before the suffix, whole numbers
/// below one thousand.
pub fn format_compact(amount: Money, currency: &CurrencyDescriptor) -> String {
    match currency.scheme {
        NumberingScheme::Ungrouped => fixed(amount, 0, RoundingStrategy::MidpointAwayFromZero),
        scheme => abbreviate(amount, scheme, COMPACT_FRACTION_DIGITS, "", 0),
    }
}

/// Insert separators into a run of ASCII digits.
///
/// Indian grouping keeps the last three digits together and pairs the rest;
/// Western grouping uses threes throughout; ungrouped input is returned as is.
pub fn group_digits(digits: &str, scheme: NumberingScheme) -> String {
    let lead_group = match scheme {
        NumberingScheme::Indian => 2,
        NumberingScheme::Western => 3,
        NumberingScheme::Ungrouped => return digits.to_string(),
    };
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::with_capacity(head.len() / lead_group + 2);
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(lead_group);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    groups.push(tail);
    groups.join(",")
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

fn abbreviate(
    amount: Money,
    scheme: NumberingScheme,
    precision: u32,
    separator: &str,
    plain_precision: u32,
) -> String {
    let magnitudes: &[(Decimal, &str)] = match scheme {
        NumberingScheme::Indian => &INDIAN_MAGNITUDES,
        NumberingScheme::Western => &WESTERN_MAGNITUDES,
        NumberingScheme::Ungrouped => &[],
    };

    match magnitudes.iter().find(|(threshold, _)| amount >= *threshold) {
        Some((divisor, suffix)) => format!(
            "{}{}{}",
            fixed(
                amount / divisor,
                precision,
                RoundingStrategy::MidpointAwayFromZero
            ),
            separator,
            suffix
        ),
        None => fixed(
            amount,
            plain_precision,
            RoundingStrategy::MidpointAwayFromZero,
        ),
    }
}

/// Round to exactly `dp` places and render without separators.
fn fixed(amount: Money, dp: u32, strategy: RoundingStrategy) -> String {
    let rounded = amount.round_dp_with_strategy(dp, strategy);
    // Avoid printing "-0.00".
    let rounded = if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    };
    format!("{:.*}", dp as usize, rounded)
}

fn grouped(amount: Money, scheme: NumberingScheme, dp: u32, strategy: RoundingStrategy) -> String {
    let plain = fixed(amount, dp, strategy);
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain.as_str()),
    };
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let mut out = String::with_capacity(plain.len() + integer.len() / 2);
    out.push_str(sign);
    out.push_str(&group_digits(integer, scheme));
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

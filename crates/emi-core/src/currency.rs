//! Display currencies and their numbering conventions.
//!
//! The catalog is static. Lookups by code fall back to [`DEFAULT_CURRENCY`]
//! (Indian Rupee) when the code is unknown.

use serde::Serialize;

/// Digit grouping and abbreviation convention used when displaying amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberingScheme {
    /// Lakh/crore grouping (1,00,00,000) with K / L / Cr suffixes.
    Indian,
    /// Thousands grouping (10,000,000) with K / M / B suffixes.
    Western,
    /// No separators and no suffixes.
    Ungrouped,
}

/// A display currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CurrencyDescriptor {
    /// ISO 4217 code.
    pub code: &'static str,
    pub name: &'static str,
    /// Prefix placed directly before the formatted number.
    pub symbol: &'static str,
    pub scheme: NumberingScheme,
}

pub const INR: CurrencyDescriptor = CurrencyDescriptor {
    code: "INR",
    name: "Indian Rupee",
    symbol: "₹",
    scheme: NumberingScheme::Indian,
};

pub const USD: CurrencyDescriptor = western("USD", "US Dollar", "$");
pub const EUR: CurrencyDescriptor = western("EUR", "Euro", "€");
pub const GBP: CurrencyDescriptor = western("GBP", "British Pound", "£");
pub const JPY: CurrencyDescriptor = western("JPY", "Japanese Yen", "¥");
pub const AUD: CurrencyDescriptor = western("AUD", "Australian Dollar", "A$");
pub const CAD: CurrencyDescriptor = western("CAD", "Canadian Dollar", "C$");
pub const CHF: CurrencyDescriptor = western("CHF", "Swiss Franc", "CHF");
pub const CNY: CurrencyDescriptor = western("CNY", "Chinese Yuan", "¥");
pub const AED: CurrencyDescriptor = western("AED", "UAE Dirham", "د.إ");
pub const SAR: CurrencyDescriptor = western("SAR", "Saudi Riyal", "﷼");
pub const SGD: CurrencyDescriptor = western("SGD", "Singapore Dollar", "S$");

/// Currency used when a code is missing or unknown.
pub const DEFAULT_CURRENCY: CurrencyDescriptor = INR;

/// Every currency offered for display, in presentation order.
pub static SUPPORTED_CURRENCIES: [CurrencyDescriptor; 12] =
    [INR, USD, EUR, GBP, JPY, AUD, CAD, CHF, CNY, AED, SAR, SGD];

const fn western(code: &'static str, name: &'static str, symbol: &'static str) -> CurrencyDescriptor {
    CurrencyDescriptor {
        code,
        name,
        symbol,
        scheme: NumberingScheme::Western,
    }
}

/// Look up a supported currency by its code (case-insensitive).
pub fn find_currency(code: &str) -> Option<&'static CurrencyDescriptor> {
    let code = code.trim();
    SUPPORTED_CURRENCIES
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(code))
}

/// Look up a currency by code, falling back to [`DEFAULT_CURRENCY`].
pub fn currency_or_default(code: &str) -> &'static CurrencyDescriptor {
    find_currency(code).unwrap_or(&SUPPORTED_CURRENCIES[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_first_in_catalog() {
        assert_eq!(SUPPORTED_CURRENCIES[0], DEFAULT_CURRENCY);
        assert_eq!(DEFAULT_CURRENCY.scheme, NumberingScheme::Indian);
    }

    #[test]
    fn test_find_known_code() {
        let usd = find_currency("USD").unwrap();
        assert_eq!(usd.symbol, "$");
        assert_eq!(usd.scheme, NumberingScheme::Western);
        assert_eq!(find_currency(" sgd ").unwrap().symbol, "S$");
    }

    #[test]
    fn test_unknown_code_falls_back_to_rupee() {
        assert!(find_currency("XYZ").is_none());
        assert_eq!(currency_or_default("XYZ").code, "INR");
        assert_eq!(currency_or_default("").code, "INR");
    }

    #[test]
    fn test_codes_are_unique() {
        for (i, a) in SUPPORTED_CURRENCIES.iter().enumerate() {
            for b in &SUPPORTED_CURRENCIES[i + 1..] {
                assert_ne!(a.code, b.code);
            }
        }
    }
}

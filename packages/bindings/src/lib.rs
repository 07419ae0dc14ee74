use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use std::str::FromStr;

use emi_core::amortization::LoanInput;
use emi_core::currency::{currency_or_default, SUPPORTED_CURRENCIES};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Amounts cross the boundary as strings to keep full decimal precision.
fn parse_amount(amount: &str) -> NapiResult<Decimal> {
    Decimal::from_str(amount.trim()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// EMI
// ---------------------------------------------------------------------------

/// `{"principal", "annual_rate_percent", "tenure_months"}` in, output envelope out.
#[napi]
pub fn calculate_emi(input_json: String) -> NapiResult<String> {
    let input: LoanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = emi_core::analyze(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

#[napi]
pub fn format_currency(amount: String, currency_code: String) -> NapiResult<String> {
    let amount = parse_amount(&amount)?;
    Ok(emi_core::format_currency(amount, currency_or_default(&currency_code)))
}

#[napi]
pub fn format_amount(amount: String, currency_code: String, precision: u32) -> NapiResult<String> {
    let amount = parse_amount(&amount)?;
    Ok(emi_core::format_amount(
        amount,
        currency_or_default(&currency_code),
        precision,
    ))
}

#[napi]
pub fn format_compact(amount: String, currency_code: String) -> NapiResult<String> {
    let amount = parse_amount(&amount)?;
    Ok(emi_core::format_compact(amount, currency_or_default(&currency_code)))
}

#[napi]
pub fn format_live_input(input: String, currency_code: String) -> String {
    emi_core::input::format_live_input(&input, currency_or_default(&currency_code))
}

#[napi]
pub fn sanitize_decimal_input(input: String) -> String {
    emi_core::input::sanitize_decimal_input(&input)
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[napi]
pub fn list_currencies() -> NapiResult<String> {
    serde_json::to_string(&SUPPORTED_CURRENCIES[..]).map_err(to_napi_error)
}

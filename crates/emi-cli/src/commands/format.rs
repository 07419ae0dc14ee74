use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use emi_core::format::CURRENCY_FRACTION_DIGITS;
use emi_core::input::{format_live_input, raw_digits, sanitize_decimal_input, strip_formatting};
use emi_core::{format_amount, format_compact, format_currency};

use crate::commands::Context;
use crate::error::{CliError, CliResult};

/// Arguments for formatting a single amount
#[derive(Args)]
pub struct FormatArgs {
    /// Amount to format; separators and symbols are ignored
    #[arg(allow_hyphen_values = true)]
    pub amount: String,

    /// Display currency code (defaults to the saved preference)
    #[arg(long, short = 'c')]
    pub currency: Option<String>,

    /// Rendering style
    #[arg(long, value_enum, default_value = "full")]
    pub style: FormatStyle,

    /// Fraction digits for the abbreviated style
    #[arg(long, default_value_t = CURRENCY_FRACTION_DIGITS)]
    pub precision: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatStyle {
    /// Symbol plus fully grouped amount, e.g. ₹1,23,456.00
    Full,
    /// Magnitude suffix, e.g. 1.23 L
    Abbreviated,
    /// Table-cell form, e.g. 1.2L
    Compact,
}

/// Arguments for cleaning raw field input
#[derive(Args)]
pub struct SanitizeArgs {
    /// Text as typed into an amount or rate field
    #[arg(allow_hyphen_values = true)]
    pub text: String,

    /// Treat the text as a rate (digits and a single decimal point)
    #[arg(long)]
    pub decimal: bool,

    /// Currency whose grouping is applied to amounts
    #[arg(long, short = 'c')]
    pub currency: Option<String>,
}

pub fn run_format(args: FormatArgs, ctx: &Context) -> CliResult<Value> {
    let amount = parse_amount(&args.amount)?;
    let currency = ctx.display_currency(args.currency.as_deref())?;

    let formatted = match args.style {
        FormatStyle::Full => format_currency(amount, currency),
        FormatStyle::Abbreviated => format_amount(amount, currency, args.precision),
        FormatStyle::Compact => format_compact(amount, currency),
    };

    Ok(json!({
        "amount": amount,
        "currency": currency.code,
        "formatted": formatted,
    }))
}

pub fn run_sanitize(args: SanitizeArgs, ctx: &Context) -> CliResult<Value> {
    if args.decimal {
        return Ok(json!({
            "input": args.text,
            "sanitized": sanitize_decimal_input(&args.text),
        }));
    }

    let currency = ctx.display_currency(args.currency.as_deref())?;
    Ok(json!({
        "input": args.text,
        "currency": currency.code,
        "raw": raw_digits(&args.text),
        "display": format_live_input(&args.text, currency),
    }))
}

/// Parse a possibly formatted amount, keeping a leading minus sign.
pub fn parse_amount(text: &str) -> CliResult<Decimal> {
    let trimmed = text.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let value: Decimal = strip_formatting(body)
        .parse()
        .map_err(|_| CliError::InvalidRequest(format!("'{text}' is not a number")))?;
    Ok(if negative { -value } else { value })
}

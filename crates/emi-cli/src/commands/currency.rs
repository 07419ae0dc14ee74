use clap::{Args, Subcommand};
use serde_json::{json, Value};
use tracing::info;

use emi_core::currency::{find_currency, CurrencyDescriptor, SUPPORTED_CURRENCIES};
use emi_core::preferences::PreferenceStore;

use crate::commands::Context;
use crate::error::{CliError, CliResult};

/// Read or change the saved display currency
#[derive(Args)]
pub struct CurrencyArgs {
    #[command(subcommand)]
    pub action: CurrencyAction,
}

#[derive(Subcommand)]
pub enum CurrencyAction {
    /// Show the currency used when no --currency flag is given
    Get,
    /// Save a new display currency
    Set {
        /// ISO 4217 code from `emi currencies`
        code: String,
    },
}

pub fn run_currencies() -> CliResult<Value> {
    Ok(serde_json::to_value(&SUPPORTED_CURRENCIES[..])?)
}

pub fn run_currency(args: CurrencyArgs, ctx: &Context) -> CliResult<Value> {
    match args.action {
        CurrencyAction::Get => {
            let currency = ctx.display_currency(None)?;
            describe(currency)
        }
        CurrencyAction::Set { code } => {
            let currency = find_currency(&code).ok_or(CliError::UnknownCurrency(code))?;
            ctx.preference_store()?.set_selected_currency_code(currency.code)?;
            info!(code = currency.code, "display currency saved");
            describe(currency)
        }
    }
}

fn describe(currency: &CurrencyDescriptor) -> CliResult<Value> {
    let mut value = serde_json::to_value(currency)?;
    if let Value::Object(map) = &mut value {
        map.insert("selected".into(), json!(true));
    }
    Ok(value)
}

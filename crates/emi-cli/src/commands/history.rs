use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use emi_core::history::{CalculationRecord, HistoryStore};
use emi_core::types::{Money, Percent};
use emi_core::{format_amount, format_currency, CurrencyDescriptor};

use crate::commands::loan::SUMMARY_PRECISION;
use crate::commands::Context;
use crate::error::{CliError, CliResult};

/// Browse and manage saved calculations
#[derive(Args)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub action: HistoryAction,
}

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List saved calculations, newest first
    List {
        /// Maximum number of entries (defaults to `history_limit` from config)
        #[arg(long, short = 'n')]
        limit: Option<usize>,

        /// Display currency code (defaults to the saved preference)
        #[arg(long, short = 'c')]
        currency: Option<String>,
    },
    /// Show one saved calculation
    Show { id: u64 },
    /// Number of saved calculations
    Count,
    /// Delete one saved calculation
    Delete { id: u64 },
    /// Delete every saved calculation
    Clear,
}

/// One history entry as shown to the user.
#[derive(Debug, Serialize)]
pub struct HistoryRow {
    pub id: u64,
    pub saved_at: String,
    pub loan_amount: Money,
    pub interest_rate: Percent,
    pub tenure_months: u32,
    pub loan_amount_display: String,
    pub emi_display: String,
    pub total_interest_display: String,
    pub total_payable_display: String,
}

pub fn run_history(args: HistoryArgs, ctx: &Context) -> CliResult<Value> {
    match args.action {
        HistoryAction::List { limit, currency } => {
            let currency = ctx.display_currency(currency.as_deref())?;
            let limit = limit.unwrap_or(ctx.config.history_limit);
            let records = ctx.history_store()?.recent(limit)?;
            let rows: Vec<HistoryRow> = records.iter().map(|r| history_row(r, currency)).collect();
            Ok(serde_json::to_value(rows)?)
        }
        HistoryAction::Show { id } => {
            let record = ctx.history_store()?.get(id)?.ok_or(CliError::RecordNotFound(id))?;
            Ok(serde_json::to_value(record)?)
        }
        HistoryAction::Count => Ok(json!({ "count": ctx.history_store()?.count()? })),
        HistoryAction::Delete { id } => {
            if !ctx.history_store()?.delete(id)? {
                return Err(CliError::RecordNotFound(id));
            }
            info!(id, "history record deleted");
            Ok(json!({ "deleted": id }))
        }
        HistoryAction::Clear => {
            let mut store = ctx.history_store()?;
            let removed = store.count()?;
            store.clear()?;
            info!(removed, "history cleared");
            Ok(json!({ "deleted": removed }))
        }
    }
}

pub fn history_row(record: &CalculationRecord, currency: &CurrencyDescriptor) -> HistoryRow {
    HistoryRow {
        id: record.id,
        saved_at: record.timestamp.format("%Y-%m-%d %H:%M").to_string(),
        loan_amount: record.loan_amount,
        interest_rate: record.interest_rate,
        tenure_months: record.tenure_months,
        loan_amount_display: format_currency(record.loan_amount, currency),
        emi_display: format_currency(record.emi_amount, currency),
        total_interest_display: format_amount(record.total_interest, currency, SUMMARY_PRECISION),
        total_payable_display: format_currency(record.total_payable, currency),
    }
}

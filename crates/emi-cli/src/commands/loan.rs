use chrono::Utc;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use emi_core::amortization::{self, AmortizationEntry, EmiResult, LoanInput};
use emi_core::history::{CalculationRecord, HistoryStore};
use emi_core::input::{sanitize_decimal_input, strip_formatting};
use emi_core::types::{ComputationOutput, Money, Percent};
use emi_core::{format_amount, format_compact, format_currency, CurrencyDescriptor, EmiError};

use crate::commands::Context;
use crate::config::InputLimits;
use crate::error::{CliError, CliResult};
use crate::input;

/// Fraction digits for abbreviated amounts in the summary.
pub(crate) const SUMMARY_PRECISION: u32 = 2;

const MONTHS_PER_YEAR: u32 = 12;

/// Loan parameters shared by `calculate` and `schedule`
#[derive(Args)]
pub struct LoanArgs {
    /// Loan amount; separators and currency symbols are ignored (e.g. "25,00,000")
    #[arg(long, short = 'p')]
    pub principal: Option<String>,

    /// Annual interest rate in percent (e.g. 8.5)
    #[arg(long, short = 'r')]
    pub rate: Option<String>,

    /// Tenure in years
    #[arg(long, short = 'y', conflicts_with = "tenure_months")]
    pub tenure_years: Option<u32>,

    /// Tenure in months
    #[arg(long, short = 'm')]
    pub tenure_months: Option<u32>,

    /// Display currency code (defaults to the saved preference)
    #[arg(long, short = 'c')]
    pub currency: Option<String>,

    /// Path to JSON input file with principal, annual_rate_percent and tenure_months
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the EMI summary
#[derive(Args)]
pub struct CalculateArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Do not save this calculation to history
    #[arg(long)]
    pub no_save: bool,
}

/// Arguments for the amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// How amounts are rendered
    #[arg(long, value_enum, default_value = "compact")]
    pub style: ScheduleStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScheduleStyle {
    /// Unrounded decimal values
    Raw,
    /// Abbreviated cells, e.g. 87.9K / 9.2L
    Compact,
    /// Symbol-prefixed grouped amounts
    Full,
}

/// Flat summary of one calculation, ready for any output format.
#[derive(Debug, Serialize)]
pub struct LoanSummary {
    pub currency: &'static str,
    pub principal_amount: Money,
    pub annual_rate_percent: Percent,
    pub tenure_months: u32,
    pub emi_amount: Money,
    pub total_interest: Money,
    pub total_payable: Money,
    pub principal_percent: u32,
    pub interest_percent: u32,
    pub emi_display: String,
    pub total_payable_display: String,
    pub principal_display: String,
    pub total_interest_display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_id: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct ScheduleRow {
    pub month: u32,
    pub emi: String,
    pub principal: String,
    pub interest: String,
    pub balance: String,
}

pub fn run_calculate(args: CalculateArgs, ctx: &Context) -> CliResult<Value> {
    let limits = &ctx.config.limits;
    let loan = resolve_loan(&args.loan, limits)?;
    let currency = ctx.display_currency(args.loan.currency.as_deref())?;
    let output = amortization::analyze(&loan).map_err(|e| explain(e, limits))?;

    let history_id = if args.no_save {
        None
    } else {
        save_to_history(ctx, &loan, &output.result)
    };

    let summary = build_summary(&loan, &output.result, currency, history_id);
    Ok(serde_json::to_value(rewrap(output, summary))?)
}

pub fn run_schedule(args: ScheduleArgs, ctx: &Context) -> CliResult<Value> {
    let limits = &ctx.config.limits;
    let loan = resolve_loan(&args.loan, limits)?;
    let currency = ctx.display_currency(args.loan.currency.as_deref())?;
    let output = amortization::analyze(&loan).map_err(|e| explain(e, limits))?;

    let rows = schedule_rows(&output.result.amortization_schedule, currency, args.style);
    Ok(serde_json::to_value(rewrap(output, rows))?)
}

/// Build the loan from `--input`, flags, or piped stdin, then apply the
/// configured presentation limits.
pub fn resolve_loan(args: &LoanArgs, limits: &InputLimits) -> CliResult<LoanInput> {
    let has_flags = args.principal.is_some()
        || args.rate.is_some()
        || args.tenure_years.is_some()
        || args.tenure_months.is_some();

    let loan = if args.input.is_none() && has_flags {
        LoanInput {
            principal: parse_principal(args.principal.as_deref())?,
            annual_rate_percent: parse_rate(args.rate.as_deref(), limits)?,
            tenure_months: tenure_in_months(args.tenure_years, args.tenure_months, limits)?,
        }
    } else {
        input::read_request::<LoanInput>(args.input.as_deref())?.ok_or_else(|| {
            CliError::MissingArgument(
                "--principal, --rate and --tenure-years (or provide --input)".into(),
            )
        })?
    };

    validate_loan(&loan, limits)?;
    Ok(loan)
}

pub fn parse_principal(raw: Option<&str>) -> CliResult<Money> {
    raw.map(strip_formatting)
        .and_then(|s| s.parse::<Decimal>().ok())
        .ok_or(CliError::InvalidLoanAmount)
}

pub fn parse_rate(raw: Option<&str>, limits: &InputLimits) -> CliResult<Percent> {
    raw.map(sanitize_decimal_input)
        .and_then(|s| s.parse::<Decimal>().ok())
        .ok_or_else(|| rate_error(limits))
}

pub fn tenure_in_months(
    years: Option<u32>,
    months: Option<u32>,
    limits: &InputLimits,
) -> CliResult<u32> {
    match (years, months) {
        (_, Some(m)) => Ok(m),
        (Some(y), None) => y.checked_mul(MONTHS_PER_YEAR).ok_or_else(|| tenure_error(limits)),
        (None, None) => Err(tenure_error(limits)),
    }
}

/// Presentation-layer range checks, stricter than the engine's own.
pub fn validate_loan(loan: &LoanInput, limits: &InputLimits) -> CliResult<()> {
    if loan.principal <= Decimal::ZERO {
        return Err(CliError::InvalidLoanAmount);
    }
    if loan.annual_rate_percent < Decimal::ZERO || loan.annual_rate_percent > limits.max_rate_percent {
        return Err(rate_error(limits));
    }
    let min_months = limits.min_tenure_years.saturating_mul(MONTHS_PER_YEAR);
    let max_months = limits.max_tenure_years.saturating_mul(MONTHS_PER_YEAR);
    if loan.tenure_months < min_months || loan.tenure_months > max_months {
        return Err(tenure_error(limits));
    }
    Ok(())
}

pub fn build_summary(
    loan: &LoanInput,
    result: &EmiResult,
    currency: &'static CurrencyDescriptor,
    history_id: Option<u64>,
) -> LoanSummary {
    let breakdown = result.payment_breakdown();
    LoanSummary {
        currency: currency.code,
        principal_amount: result.principal_amount,
        annual_rate_percent: loan.annual_rate_percent,
        tenure_months: result.tenure_months(),
        emi_amount: result.emi_amount,
        total_interest: result.total_interest,
        total_payable: result.total_payable,
        principal_percent: breakdown.principal_percent,
        interest_percent: breakdown.interest_percent,
        emi_display: format_currency(result.emi_amount, currency),
        total_payable_display: format_currency(result.total_payable, currency),
        principal_display: format_amount(result.principal_amount, currency, SUMMARY_PRECISION),
        total_interest_display: format_amount(result.total_interest, currency, SUMMARY_PRECISION),
        history_id,
    }
}

pub fn schedule_rows(
    schedule: &[AmortizationEntry],
    currency: &CurrencyDescriptor,
    style: ScheduleStyle,
) -> Vec<ScheduleRow> {
    let render = |amount: Money| match style {
        ScheduleStyle::Raw => amount.to_string(),
        ScheduleStyle::Compact => format_compact(amount, currency),
        ScheduleStyle::Full => format_currency(amount, currency),
    };
    schedule
        .iter()
        .map(|e| ScheduleRow {
            month: e.month,
            emi: render(e.emi_amount),
            principal: render(e.principal_component),
            interest: render(e.interest_component),
            balance: render(e.outstanding_principal),
        })
        .collect()
}

/// History is best-effort: a failed save is logged, never fatal.
fn save_to_history(ctx: &Context, loan: &LoanInput, result: &EmiResult) -> Option<u64> {
    let record = CalculationRecord::from_result(loan, result, Utc::now());
    let saved = ctx
        .history_store()
        .and_then(|mut store| store.append(record).map_err(CliError::from));
    match saved {
        Ok(id) => {
            info!(id, "calculation saved to history");
            Some(id)
        }
        Err(e) => {
            warn!(error = %e, "could not save calculation to history");
            None
        }
    }
}

fn rewrap<T: Serialize, U: Serialize>(output: ComputationOutput<T>, result: U) -> ComputationOutput<U> {
    ComputationOutput {
        result,
        methodology: output.methodology,
        assumptions: output.assumptions,
        warnings: output.warnings,
        metadata: output.metadata,
    }
}

/// Map an engine rejection onto the message for the offending field.
fn explain(e: EmiError, limits: &InputLimits) -> CliError {
    match e.field() {
        Some("principal") => CliError::InvalidLoanAmount,
        Some("annual_rate_percent") => rate_error(limits),
        Some("tenure_months") => tenure_error(limits),
        _ => CliError::Core(e),
    }
}

fn rate_error(limits: &InputLimits) -> CliError {
    CliError::InvalidInterestRate {
        max: limits.max_rate_percent.normalize().to_string(),
    }
}

fn tenure_error(limits: &InputLimits) -> CliError {
    CliError::InvalidTenure {
        min: limits.min_tenure_years,
        max: limits.max_tenure_years,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emi_core::currency::{INR, USD};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn flags(principal: &str, rate: &str, years: u32) -> LoanArgs {
        LoanArgs {
            principal: Some(principal.into()),
            rate: Some(rate.into()),
            tenure_years: Some(years),
            tenure_months: None,
            currency: None,
            input: None,
        }
    }

    #[test]
    fn test_resolve_from_flags_strips_separators() {
        let loan = resolve_loan(&flags("₹10,00,000", "10", 1), &InputLimits::default()).unwrap();
        assert_eq!(loan.principal, dec!(1_000_000));
        assert_eq!(loan.annual_rate_percent, dec!(10));
        assert_eq!(loan.tenure_months, 12);
    }

    #[test]
    fn test_months_flag_wins() {
        let mut args = flags("500000", "9", 1);
        args.tenure_years = None;
        args.tenure_months = Some(18);
        let loan = resolve_loan(&args, &InputLimits::default()).unwrap();
        assert_eq!(loan.tenure_months, 18);
    }

    #[test]
    fn test_zero_rate_allowed() {
        assert!(resolve_loan(&flags("100000", "0", 2), &InputLimits::default()).is_ok());
    }

    #[test]
    fn test_rate_with_extra_points_is_collapsed() {
        let limits = InputLimits::default();
        assert_eq!(parse_rate(Some("8.5.5"), &limits).unwrap(), dec!(8.55));
    }

    #[test]
    fn test_messages_per_field() {
        let limits = InputLimits::default();
        let err = resolve_loan(&flags("0", "10", 1), &limits).unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid loan amount");

        let err = resolve_loan(&flags("abc", "10", 1), &limits).unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid loan amount");

        let err = resolve_loan(&flags("1000", "101", 1), &limits).unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid interest rate (0-100)");

        let err = resolve_loan(&flags("1000", "10", 31), &limits).unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid tenure (1-30 years)");

        let err = resolve_loan(&flags("1000", "10", 0), &limits).unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid tenure (1-30 years)");
    }

    #[test]
    fn test_configured_limits_apply() {
        let limits = InputLimits {
            max_rate_percent: dec!(36),
            min_tenure_years: 1,
            max_tenure_years: 5,
        };
        let err = resolve_loan(&flags("1000", "40", 1), &limits).unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid interest rate (0-36)");
        assert!(resolve_loan(&flags("1000", "12", 6), &limits).is_err());
    }

    #[test]
    fn test_engine_errors_map_to_field_messages() {
        let limits = InputLimits::default();
        let err = amortization::compute(dec!(1000), dec!(10), 0).unwrap_err();
        assert!(matches!(explain(err, &limits), CliError::InvalidTenure { .. }));
    }

    #[test]
    fn test_summary_display_strings() {
        let loan = LoanInput {
            principal: dec!(1_000_000),
            annual_rate_percent: dec!(10),
            tenure_months: 12,
        };
        let result = amortization::compute(loan.principal, loan.annual_rate_percent, 12).unwrap();

        let s = build_summary(&loan, &result, &INR, Some(7));
        assert_eq!(s.currency, "INR");
        assert_eq!(s.emi_display, "₹87,915.89");
        assert_eq!(s.total_payable_display, "₹10,54,990.65");
        assert_eq!(s.principal_display, "10.00 L");
        assert_eq!(s.total_interest_display, "54.99 K");
        assert_eq!(s.principal_percent, 94);
        assert_eq!(s.history_id, Some(7));

        let s = build_summary(&loan, &result, &USD, None);
        assert_eq!(s.emi_display, "$87,915.89");
        assert_eq!(s.principal_display, "1.00 M");
    }

    #[test]
    fn test_schedule_rows_styles() {
        let result = amortization::compute(dec!(1_000_000), dec!(10), 12).unwrap();
        let schedule = &result.amortization_schedule;

        let compact = schedule_rows(schedule, &INR, ScheduleStyle::Compact);
        assert_eq!(compact.len(), 12);
        assert_eq!(compact[0].month, 1);
        assert_eq!(compact[0].emi, "87.9K");
        assert_eq!(compact[0].balance, "9.2L");

        let full = schedule_rows(schedule, &USD, ScheduleStyle::Full);
        assert_eq!(full[0].interest, "$8,333.33");

        let raw = schedule_rows(schedule, &USD, ScheduleStyle::Raw);
        assert!(raw[0].interest.starts_with("8333.33"));
    }
}

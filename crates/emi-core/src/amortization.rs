//! Equated Monthly Installment (EMI) engine.
//!
//! Computes the level monthly payment for a fully amortising loan using the
//! reducing-balance formula, then walks the loan month by month to split each
//! installment into interest and principal. All math in `rust_decimal::Decimal`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::error::EmiError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::EmiCoreResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Longest tenure callers are expected to request (30 years).
const TYPICAL_MAX_TENURE_MONTHS: u32 = 360;

/// Annual rate above which results are flagged as unusual.
const TYPICAL_MAX_RATE_PERCENT: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// A single loan to amortise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    /// Amount borrowed, currency-agnostic.
    pub principal: Money,
    /// Annual interest rate as a percentage (e.g., 10.5 = 10.5% p.a.).
    pub annual_rate_percent: Percent,
    /// Number of monthly installments.
    pub tenure_months: u32,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One month of the amortisation schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationEntry {
    /// 1-based month number.
    pub month: u32,
    pub emi_amount: Money,
    pub principal_component: Money,
    pub interest_component: Money,
    /// Balance remaining after this month's payment. Never negative.
    pub outstanding_principal: Money,
}

/// Summary figures and full schedule for one loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmiResult {
    pub emi_amount: Money,
    pub total_interest: Money,
    pub total_payable: Money,
    pub principal_amount: Money,
    pub amortization_schedule: Vec<AmortizationEntry>,
}

/// Whole-percent split of the total payable between principal and interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    pub principal_percent: u32,
    pub interest_percent: u32,
}

impl EmiResult {
    /// Number of installments in the schedule.
    pub fn tenure_months(&self) -> u32 {
        self.amortization_schedule.len() as u32
    }

    /// Share of the total payable going to principal and to interest, each
    /// truncated to a whole percent.
    pub fn payment_breakdown(&self) -> PaymentBreakdown {
        if self.total_payable <= Decimal::ZERO {
            return PaymentBreakdown {
                principal_percent: 0,
                interest_percent: 0,
            };
        }
        let share = |part: Money| -> u32 {
            (part / self.total_payable * dec!(100))
                .trunc()
                .to_u32()
                .unwrap_or(0)
        };
        PaymentBreakdown {
            principal_percent: share(self.principal_amount),
            interest_percent: share(self.total_interest.max(Decimal::ZERO)),
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the EMI, totals and month-by-month schedule for a loan.
///
/// Rejects a non-positive principal, a zero tenure or a negative rate with
/// [`EmiError::InvalidInput`]. A zero rate takes an exact straight-line
/// branch (`principal / tenure`) rather than the limit of the general formula.
pub fn compute(
    principal: Money,
    annual_rate_percent: Percent,
    tenure_months: u32,
) -> EmiCoreResult<EmiResult> {
    if let Err(e) = validate(principal, annual_rate_percent, tenure_months) {
        warn!(error = %e, "rejected EMI input");
        return Err(e);
    }
    debug!(
        %principal,
        %annual_rate_percent,
        tenure_months,
        "computing EMI schedule"
    );

    let monthly_rate = monthly_rate(annual_rate_percent);
    let emi = level_payment(principal, monthly_rate, tenure_months)?;

    let total_payable = emi
        .checked_mul(Decimal::from(tenure_months))
        .ok_or_else(|| EmiError::invalid("principal", "Total payable exceeds supported range"))?;
    let total_interest = total_payable - principal;

    let amortization_schedule = build_schedule(principal, monthly_rate, emi, tenure_months);

    Ok(EmiResult {
        emi_amount: emi,
        total_interest,
        total_payable,
        principal_amount: principal,
        amortization_schedule,
    })
}

/// Run [`compute`] and wrap the result in the standard output envelope.
pub fn analyze(input: &LoanInput) -> EmiCoreResult<ComputationOutput<EmiResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = compute(
        input.principal,
        input.annual_rate_percent,
        input.tenure_months,
    )?;

    if input.tenure_months > TYPICAL_MAX_TENURE_MONTHS {
        warnings.push(format!(
            "Tenure of {} months exceeds the usual {}-month maximum",
            input.tenure_months, TYPICAL_MAX_TENURE_MONTHS
        ));
    }
    if input.annual_rate_percent > TYPICAL_MAX_RATE_PERCENT {
        warnings.push(format!(
            "Annual rate of {}% is above {}%",
            input.annual_rate_percent, TYPICAL_MAX_RATE_PERCENT
        ));
    }
    if input.annual_rate_percent.is_zero() {
        warnings.push("Zero interest rate: installments repay principal only".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Reducing-balance EMI amortization",
        input,
        warnings,
        elapsed,
        result,
    ))
}

/// Convert an annual percentage rate to a monthly decimal rate.
pub fn monthly_rate(annual_rate_percent: Percent) -> Rate {
    annual_rate_percent / MONTHS_PER_YEAR / dec!(100)
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

fn validate(principal: Money, annual_rate_percent: Percent, tenure_months: u32) -> EmiCoreResult<()> {
    if principal <= Decimal::ZERO {
        return Err(EmiError::invalid("principal", "Principal must be positive"));
    }
    if annual_rate_percent < Decimal::ZERO {
        return Err(EmiError::invalid(
            "annual_rate_percent",
            "Interest rate cannot be negative",
        ));
    }
    if tenure_months == 0 {
        return Err(EmiError::invalid(
            "tenure_months",
            "Tenure must be at least one month",
        ));
    }
    Ok(())
}

/// EMI = P × r × (1+r)^n / ((1+r)^n − 1), or P / n when r is zero.
///
/// A nonzero r is at least 1e-28, so (1+r)^n − 1 is never zero.
fn level_payment(principal: Money, monthly_rate: Rate, tenure_months: u32) -> EmiCoreResult<Money> {
    let periods = Decimal::from(tenure_months);
    if monthly_rate.is_zero() {
        return Ok(principal / periods);
    }

    let growth = (Decimal::ONE + monthly_rate)
        .checked_powu(u64::from(tenure_months))
        .ok_or_else(|| {
            EmiError::invalid(
                "tenure_months",
                "Compounding factor exceeds supported range for this rate and tenure",
            )
        })?;
    let rate_overflow = || {
        EmiError::invalid(
            "annual_rate_percent",
            "Rate is too high to amortise over this tenure",
        )
    };
    let factor = monthly_rate
        .checked_mul(growth)
        .and_then(|numerator| numerator.checked_div(growth - Decimal::ONE))
        .ok_or_else(rate_overflow)?;
    principal
        .checked_mul(factor)
        .ok_or_else(|| EmiError::invalid("principal", "Principal exceeds supported range"))
}

fn build_schedule(
    principal: Money,
    monthly_rate: Rate,
    emi: Money,
    tenure_months: u32,
) -> Vec<AmortizationEntry> {
    let mut schedule = Vec::with_capacity(tenure_months as usize);
    let mut outstanding = principal;

    for month in 1..=tenure_months {
        let interest_component = outstanding * monthly_rate;
        let principal_component = emi - interest_component;

        outstanding -= principal_component;
        if outstanding < Decimal::ZERO {
            outstanding = Decimal::ZERO;
        }

        schedule.push(AmortizationEntry {
            month,
            emi_amount: emi,
            principal_component,
            interest_component,
            outstanding_principal: outstanding,
        });
    }

    schedule
}

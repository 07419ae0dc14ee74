use emi_core::amortization::{self, LoanInput};
use emi_core::EmiError;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Scenario tests
// ===========================================================================

fn car_loan() -> LoanInput {
    // 8 lakh over 5 years at 9.5%
    LoanInput {
        principal: dec!(800_000),
        annual_rate_percent: dec!(9.5),
        tenure_months: 60,
    }
}

#[test]
fn test_car_loan_summary() {
    let out = amortization::analyze(&car_loan()).unwrap();
    let r = &out.result;

    // EMI for 8L @ 9.5% / 60m ≈ 16,801.49
    assert!((r.emi_amount - dec!(16_801.49)).abs() < dec!(0.01));
    assert_eq!(r.total_payable, r.emi_amount * dec!(60));
    assert_eq!(r.total_interest, r.total_payable - r.principal_amount);
    assert!(out.warnings.is_empty());
}

#[test]
fn test_first_and_last_months_of_car_loan() {
    let r = amortization::analyze(&car_loan()).unwrap().result;
    let first = &r.amortization_schedule[0];

    // Month 1 interest = 800,000 × 9.5% / 12
    assert!((first.interest_component - dec!(6_333.333333)).abs() < dec!(0.001));
    assert!(first.interest_component > first.principal_component);

    let last = r.amortization_schedule.last().unwrap();
    assert_eq!(last.month, 60);
    assert!(last.principal_component > last.interest_component);
    assert!(last.outstanding_principal < dec!(0.000001));
}

#[test]
fn test_invalid_inputs_report_field() {
    let cases = [
        (dec!(0), dec!(10), 12, "principal"),
        (dec!(-1), dec!(10), 12, "principal"),
        (dec!(1000), dec!(-1), 12, "annual_rate_percent"),
        (dec!(1000), dec!(10), 0, "tenure_months"),
    ];
    for (principal, rate, tenure, field) in cases {
        match amortization::compute(principal, rate, tenure) {
            Err(EmiError::InvalidInput { field: f, .. }) => assert_eq!(f, field),
            other => panic!("expected InvalidInput on {field}, got {other:?}"),
        }
    }
}

#[test]
fn test_extreme_rate_and_tenure_is_rejected_not_panicking() {
    // (1 + 100/1200)^100000 is far outside the decimal range.
    let err = amortization::compute(dec!(1_000_000), dec!(100), 100_000).unwrap_err();
    assert!(matches!(err, EmiError::InvalidInput { .. }));
}

#[test]
fn test_rate_whose_numerator_overflows_is_rejected() {
    // (1+r)^N fits, r × (1+r)^N does not.
    for (principal, rate, tenure) in [
        (dec!(1000), dec!(10000), 29),
        (dec!(1), dec!(1_000_000_000), 4),
    ] {
        let err = amortization::compute(principal, rate, tenure).unwrap_err();
        assert_eq!(err.field(), Some("annual_rate_percent"), "{rate}% over {tenure}");
    }
}

#[test]
fn test_smallest_positive_rate_uses_level_formula() {
    // 1.2e-25 % p.a. is a monthly rate of exactly 1e-28.
    let rate = dec!(0.00000000000000000000000012);
    assert_eq!(amortization::monthly_rate(rate), dec!(0.0000000000000000000000000001));
    let r = amortization::compute(dec!(1200), rate, 12).unwrap();
    assert!((r.emi_amount - dec!(100)).abs() < dec!(0.000001));
    assert_eq!(r.amortization_schedule.len(), 12);
}

#[test]
fn test_loan_input_from_json() {
    let input: LoanInput = serde_json::from_str(
        r#"{"principal": "2500000", "annual_rate_percent": "8.75", "tenure_months": 180}"#,
    )
    .unwrap();
    let r = amortization::analyze(&input).unwrap().result;
    assert_eq!(r.amortization_schedule.len(), 180);
}

// ===========================================================================
// Properties
// ===========================================================================

fn principal_strategy() -> impl Strategy<Value = Decimal> {
    (100u64..10_000_000_000u64).prop_map(|cents| Decimal::from(cents) / dec!(100))
}

fn rate_strategy() -> impl Strategy<Value = Decimal> {
    (1u32..3_000u32).prop_map(|bp| Decimal::from(bp) / dec!(100))
}

proptest! {
    #[test]
    fn prop_zero_rate_is_principal_over_tenure(
        principal in principal_strategy(),
        tenure in 1u32..=360,
    ) {
        let r = amortization::compute(principal, Decimal::ZERO, tenure).unwrap();
        prop_assert_eq!(r.emi_amount, principal / Decimal::from(tenure));
        for entry in &r.amortization_schedule {
            prop_assert_eq!(entry.interest_component, Decimal::ZERO);
        }
    }

    #[test]
    fn prop_schedule_repays_principal(
        principal in principal_strategy(),
        rate in rate_strategy(),
        tenure in 1u32..=360,
    ) {
        let r = amortization::compute(principal, rate, tenure).unwrap();
        prop_assert_eq!(r.amortization_schedule.len(), tenure as usize);

        let repaid: Decimal = r.amortization_schedule.iter().map(|e| e.principal_component).sum();
        let tolerance = principal * dec!(0.000001);
        prop_assert!((repaid - principal).abs() <= tolerance);

        let last = r.amortization_schedule.last().unwrap();
        prop_assert!(last.outstanding_principal <= tolerance);
    }

    #[test]
    fn prop_entries_are_consistent(
        principal in principal_strategy(),
        rate in rate_strategy(),
        tenure in 1u32..=360,
    ) {
        let r = amortization::compute(principal, rate, tenure).unwrap();
        let mut previous = principal;
        for (i, entry) in r.amortization_schedule.iter().enumerate() {
            prop_assert_eq!(entry.month, i as u32 + 1);
            prop_assert_eq!(entry.emi_amount, r.emi_amount);
            prop_assert!(entry.outstanding_principal >= Decimal::ZERO);
            prop_assert!(entry.outstanding_principal <= previous);
            let drift = (entry.principal_component + entry.interest_component - r.emi_amount).abs();
            prop_assert!(drift <= dec!(0.000001));
            previous = entry.outstanding_principal;
        }
    }

    #[test]
    fn prop_compute_is_repeatable(
        principal in principal_strategy(),
        rate in rate_strategy(),
        tenure in 1u32..=360,
    ) {
        let a = amortization::compute(principal, rate, tenure).unwrap();
        let b = amortization::compute(principal, rate, tenure).unwrap();
        prop_assert_eq!(a, b);
    }
}

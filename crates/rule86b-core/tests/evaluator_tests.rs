use pretty_assertions::assert_eq;
use rule86b_core::evaluator::{self, Applicability, DecisionBasis, Exemption};
use rule86b_core::{CashRuleError, Money, TaxPeriodInput};
use rust_decimal_macros::dec;

// ===========================================================================
// Fixtures
// ===========================================================================

fn large_taxpayer(output_tax: Money, cash_paid: Money, cumulative: bool) -> TaxPeriodInput {
    // Monthly turnover of ₹60 lakh with no exemption facts
    TaxPeriodInput {
        taxable_value: dec!(6_000_000),
        output_tax,
        available_itc: dec!(3_000_000),
        cash_paid,
        cum_output_tax_prev_months: if cumulative { Some(dec!(0)) } else { None },
        use_cumulative_method: cumulative,
        ..Default::default()
    }
}

// ===========================================================================
// Threshold gate
// ===========================================================================

#[test]
fn test_below_threshold_never_applicable() {
    let input = TaxPeriodInput {
        taxable_value: dec!(4_999_999.99),
        output_tax: dec!(900_000),
        cash_paid: dec!(0),
        use_cumulative_method: true,
        ..Default::default()
    };
    let v = evaluator::evaluate(&input).unwrap();

    assert!(!v.applies_by_turnover);
    assert!(!v.is_applicable);
    assert_eq!(v.applicability(), Applicability::NotApplicable);
    assert!(v.reason.contains("threshold not met"));
}

#[test]
fn test_threshold_gate_overrides_everything_else() {
    let mut input = large_taxpayer(dec!(1_000_000), dec!(0), true);
    input.taxable_value = dec!(5_000_000);
    input.is_government_entity = true;
    input.income_tax_paid_prior_two_years = dec!(900_000);
    let v = evaluator::evaluate(&input).unwrap();

    assert_eq!(v.decided_by, DecisionBasis::ThresholdNotMet);
    assert!(v.exceptions.is_empty());
}

// ===========================================================================
// Cash test
// ===========================================================================

#[test]
fn test_cumulative_first_month_with_no_cash_is_applicable() {
    let input = large_taxpayer(dec!(1_000_000), dec!(0), true);
    let v = evaluator::evaluate(&input).unwrap();

    assert_eq!(v.required_cash_amount, dec!(10_000));
    assert_eq!(v.min_additional_cash_required, dec!(10_000));
    assert_eq!(v.max_usable_itc, dec!(990_000));
    assert!(v.is_applicable);
    assert_eq!(v.decided_by, DecisionBasis::Shortfall);
}

#[test]
fn test_cash_equal_to_requirement_satisfies_test() {
    let input = large_taxpayer(dec!(1_000_000), dec!(10_000), true);
    let v = evaluator::evaluate(&input).unwrap();

    assert!(!v.is_applicable);
    assert_eq!(v.decided_by, DecisionBasis::CashTestSatisfied);
    assert_eq!(v.min_additional_cash_required, dec!(0));
    assert_eq!(v.max_usable_itc, dec!(1_000_000));
    assert!(v.reason.contains("already meets the 1% test"));
}

#[test]
fn test_one_paisa_short_is_applicable() {
    let input = large_taxpayer(dec!(1_000_000), dec!(9_999.99), false);
    let v = evaluator::evaluate(&input).unwrap();

    assert!(v.is_applicable);
    assert_eq!(v.min_additional_cash_required, dec!(0.01));
}

#[test]
fn test_single_month_and_cumulative_agree_without_history() {
    let cumulative = evaluator::evaluate(&large_taxpayer(dec!(750_000), dec!(2_500), true)).unwrap();
    let single = evaluator::evaluate(&large_taxpayer(dec!(750_000), dec!(2_500), false)).unwrap();

    assert_eq!(cumulative.required_cash_amount, single.required_cash_amount);
    assert_eq!(
        cumulative.min_additional_cash_required,
        single.min_additional_cash_required
    );
    assert_eq!(cumulative.max_usable_itc, single.max_usable_itc);
    assert_eq!(cumulative.is_applicable, single.is_applicable);
}

#[test]
fn test_missing_cumulative_history_treated_as_zero() {
    let mut input = large_taxpayer(dec!(1_000_000), dec!(0), true);
    input.cum_output_tax_prev_months = None;
    let v = evaluator::evaluate(&input).unwrap();
    assert_eq!(v.required_cash_amount, dec!(10_000));
}

// ===========================================================================
// Exemptions
// ===========================================================================

#[test]
fn test_government_entity_flips_verdict() {
    let mut input = large_taxpayer(dec!(1_000_000), dec!(0), true);
    assert!(evaluator::evaluate(&input).unwrap().is_applicable);

    input.is_government_entity = true;
    let v = evaluator::evaluate(&input).unwrap();

    assert!(!v.is_applicable);
    assert_eq!(
        v.exceptions,
        vec![Exemption::GovernmentEntity.remark().to_string()]
    );
    assert!(v.reason.starts_with("One or more statutory/practical exceptions found"));
}

#[test]
fn test_exemption_beats_satisfied_cash_test() {
    let mut input = large_taxpayer(dec!(1_000_000), dec!(50_000), true);
    input.received_zero_rated_refund = true;
    let v = evaluator::evaluate(&input).unwrap();
    assert_eq!(v.decided_by, DecisionBasis::Exempt);
}

#[test]
fn test_income_tax_exception_over_limit() {
    let mut input = large_taxpayer(dec!(1_000_000), dec!(0), false);
    input.income_tax_paid_prior_two_years = dec!(100_000.01);
    let v = evaluator::evaluate(&input).unwrap();
    assert_eq!(v.exceptions, vec![Exemption::IncomeTax.remark().to_string()]);
}

// ===========================================================================
// Errors and determinism
// ===========================================================================

#[test]
fn test_negative_cash_paid_is_invalid_input() {
    let input = large_taxpayer(dec!(1_000_000), dec!(-0.01), true);
    let err = evaluator::evaluate(&input).unwrap_err();
    match err {
        CashRuleError::InvalidInput { field, .. } => assert_eq!(field, "cash_paid"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_evaluate_is_idempotent() {
    let mut input = large_taxpayer(dec!(1_234_567.89), dec!(5_000), true);
    input.cum_output_tax_prev_months = Some(dec!(4_321_000));
    let first = evaluator::evaluate(&input).unwrap();
    let second = evaluator::evaluate(&input).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_analyze_envelope_carries_verdict() {
    let input = large_taxpayer(dec!(1_000_000), dec!(0), true);
    let out = evaluator::analyze(&input).unwrap();
    let json = serde_json::to_value(&out).unwrap();

    assert_eq!(json["result"]["final_applicability"], "APPLICABLE");
    assert_eq!(json["result"]["decided_by"], "shortfall");
    assert_eq!(json["result"]["is_applicable"], true);
    assert_eq!(json["assumptions"]["turnover_threshold"], "5000000");
    assert!(out.methodology.contains("cumulative"));
}

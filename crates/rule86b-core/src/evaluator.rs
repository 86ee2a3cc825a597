use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::error::CashRuleError;
use crate::input::TaxPeriodInput;
use crate::types::*;
use crate::CashRuleResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Monthly taxable value above which Rule 86B engages (₹50,00,000).
pub const TURNOVER_THRESHOLD: Money = dec!(5_000_000);

/// Share of output tax that must be discharged in cash.
pub const MIN_CASH_RATE: Rate = dec!(0.01);

/// Previous-year refund above which the refund exception holds (₹1,00,000).
pub const REFUND_EXCEPTION_LIMIT: Money = dec!(100_000);

/// Income tax paid over the two preceding years above which the
/// income-tax exception holds (₹1,00,000).
pub const INCOME_TAX_EXCEPTION_LIMIT: Money = dec!(100_000);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Statutory and practical exemptions, in remark order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exemption {
    Refund,
    IncomeTax,
    GovernmentEntity,
    FirstReturn,
}

impl Exemption {
    pub const ALL: [Exemption; 4] = [
        Exemption::Refund,
        Exemption::IncomeTax,
        Exemption::GovernmentEntity,
        Exemption::FirstReturn,
    ];

    pub fn remark(&self) -> &'static str {
        match self {
            Exemption::Refund => {
                "Refund exception: refund above ₹1,00,000 in the previous FY \
                 (zero-rated or inverted duty supplies)."
            }
            Exemption::IncomeTax => {
                "Income-tax above ₹1,00,000 paid in the two preceding FYs \
                 (practical exception)."
            }
            Exemption::GovernmentEntity => "Government department / PSU / local body: exempt.",
            Exemption::FirstReturn => "First return after registration: exempt.",
        }
    }

    pub fn holds(&self, input: &TaxPeriodInput) -> bool {
        match self {
            Exemption::Refund => {
                input.refund_prior() > REFUND_EXCEPTION_LIMIT
                    || input.received_zero_rated_refund
                    || input.received_inverted_duty_refund
            }
            Exemption::IncomeTax => {
                input.income_tax_paid_prior_two_years > INCOME_TAX_EXCEPTION_LIMIT
            }
            Exemption::GovernmentEntity => input.is_government_entity,
            Exemption::FirstReturn => input.is_first_return_after_registration,
        }
    }
}

/// Which step of the verdict composition decided the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionBasis {
    ThresholdNotMet,
    Exempt,
    CashTestSatisfied,
    Shortfall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Applicability {
    #[serde(rename = "APPLICABLE")]
    Applicable,
    #[serde(rename = "NOT APPLICABLE")]
    NotApplicable,
}

impl fmt::Display for Applicability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Applicability::Applicable => write!(f, "APPLICABLE"),
            Applicability::NotApplicable => write!(f, "NOT APPLICABLE"),
        }
    }
}

/// Cash figures from the 1% test. `min_additional_cash_required` lies in
/// `[0, output_tax]` and the three satisfy
/// `max_usable_itc + min_additional_cash_required == output_tax`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashRequirement {
    pub required_cash_amount: Money,
    pub min_additional_cash_required: Money,
    pub max_usable_itc: Money,
}

/// Outcome of one evaluation. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub applies_by_turnover: bool,
    pub required_cash_amount: Money,
    pub min_additional_cash_required: Money,
    pub max_usable_itc: Money,
    /// Remarks of every exemption that holds, in evaluation order.
    pub exceptions: Vec<String>,
    pub is_applicable: bool,
    pub reason: String,
    pub decided_by: DecisionBasis,
}

impl Verdict {
    pub fn applicability(&self) -> Applicability {
        if self.is_applicable {
            Applicability::Applicable
        } else {
            Applicability::NotApplicable
        }
    }

    /// Exception remarks followed by the reason, as exported.
    pub fn remarks(&self) -> Vec<String> {
        let mut remarks = self.exceptions.clone();
        remarks.push(self.reason.clone());
        remarks
    }
}

/// Verdict plus presentation details for the computation envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashRuleAnalysis {
    pub final_applicability: Applicability,
    #[serde(flatten)]
    pub verdict: Verdict,
    /// Unclamped gap between the requirement and cash already paid.
    pub cash_shortfall: Money,
    pub payment_note: String,
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Minimum cash requirement for the selected mode. Assumes a validated input.
///
/// Fails only when the cumulative base exceeds the decimal range.
pub fn cash_requirement(input: &TaxPeriodInput) -> CashRuleResult<CashRequirement> {
    let base = if input.use_cumulative_method {
        input
            .cum_output_tax_prev()
            .checked_add(input.output_tax)
            .ok_or_else(|| {
                CashRuleError::invalid(
                    "cum_output_tax_prev_months",
                    "cumulative output tax exceeds the representable range",
                )
            })?
    } else {
        input.output_tax
    };
    let required_cash_amount = MIN_CASH_RATE * base;

    let min_additional_cash_required = (required_cash_amount - input.cash_paid)
        .max(Decimal::ZERO)
        .min(input.output_tax);

    Ok(CashRequirement {
        required_cash_amount,
        min_additional_cash_required,
        max_usable_itc: input.output_tax - min_additional_cash_required,
    })
}

/// Every exemption that holds, in remark order. Each is tested independently.
pub fn scan_exemptions(input: &TaxPeriodInput) -> Vec<Exemption> {
    Exemption::ALL
        .iter()
        .copied()
        .filter(|e| e.holds(input))
        .collect()
}

/// Decide whether Rule 86B restricts ITC utilisation for this return.
///
/// Priority: threshold gate, then any exemption, then the cash test; only a
/// return that clears all three with a shortfall is APPLICABLE. Below the
/// threshold the exemption scan is skipped, though the cash figures are
/// still reported.
pub fn evaluate(input: &TaxPeriodInput) -> CashRuleResult<Verdict> {
    input.validate()?;

    let applies_by_turnover = input.taxable_value > TURNOVER_THRESHOLD;
    let cash = cash_requirement(input)?;

    let exceptions: Vec<String> = if applies_by_turnover {
        scan_exemptions(input)
            .iter()
            .map(|e| e.remark().to_string())
            .collect()
    } else {
        Vec::new()
    };

    let decided_by = if !applies_by_turnover {
        DecisionBasis::ThresholdNotMet
    } else if !exceptions.is_empty() {
        DecisionBasis::Exempt
    } else if input.cash_paid >= cash.required_cash_amount {
        DecisionBasis::CashTestSatisfied
    } else {
        DecisionBasis::Shortfall
    };

    let reason = match decided_by {
        DecisionBasis::ThresholdNotMet => {
            "Monthly taxable value does not exceed ₹50,00,000 (threshold not met).".to_string()
        }
        DecisionBasis::Exempt => format!(
            "One or more statutory/practical exceptions found: {}",
            exceptions.join("; ")
        ),
        DecisionBasis::CashTestSatisfied if input.use_cumulative_method => {
            "Cumulative cash already meets the 1% test (no additional cash needed).".to_string()
        }
        DecisionBasis::CashTestSatisfied => {
            "Cash paid this month already meets the 1% test (no additional cash needed)."
                .to_string()
        }
        DecisionBasis::Shortfall => {
            "Rule 86B applies: threshold met, no exemptions, and a cash shortfall exists."
                .to_string()
        }
    };

    Ok(Verdict {
        applies_by_turnover,
        required_cash_amount: cash.required_cash_amount,
        min_additional_cash_required: cash.min_additional_cash_required,
        max_usable_itc: cash.max_usable_itc,
        exceptions,
        is_applicable: decided_by == DecisionBasis::Shortfall,
        reason,
        decided_by,
    })
}

/// Evaluate and wrap the verdict in the standard computation envelope.
pub fn analyze(input: &TaxPeriodInput) -> CashRuleResult<ComputationOutput<CashRuleAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let verdict = evaluate(input)?;

    if !input.use_cumulative_method && input.cum_output_tax_prev_months.is_some() {
        warnings.push(
            "Cumulative output tax was supplied but the single-month method is \
             selected; the figure was ignored."
                .to_string(),
        );
    }

    if input.available_itc < verdict.max_usable_itc {
        warnings.push(format!(
            "Available ITC ({}) is below the maximum usable ITC ({}); the balance \
             of the liability is payable in cash regardless of Rule 86B.",
            format_inr(input.available_itc),
            format_inr(verdict.max_usable_itc),
        ));
    }

    let cash_shortfall = (verdict.required_cash_amount - input.cash_paid).max(Decimal::ZERO);
    let payment_note = if input.cash_paid >= verdict.required_cash_amount {
        format!(
            "Already paid {} in cash which satisfies the minimum requirement of {}.",
            format_inr(input.cash_paid),
            format_inr(verdict.required_cash_amount),
        )
    } else {
        format!(
            "Paid only {} against the minimum cash requirement of {}. Shortfall = {}.",
            format_inr(input.cash_paid),
            format_inr(verdict.required_cash_amount),
            format_inr(cash_shortfall),
        )
    };

    let methodology = if input.use_cumulative_method {
        "Rule 86B applicability: turnover gate, cumulative FY-to-date 1% cash test, exemption scan"
    } else {
        "Rule 86B applicability: turnover gate, single-month 1% cash test, exemption scan"
    };

    let assumptions = serde_json::json!({
        "turnover_threshold": TURNOVER_THRESHOLD.to_string(),
        "min_cash_rate": MIN_CASH_RATE.to_string(),
        "refund_exception_limit": REFUND_EXCEPTION_LIMIT.to_string(),
        "income_tax_exception_limit": INCOME_TAX_EXCEPTION_LIMIT.to_string(),
        "use_cumulative_method": input.use_cumulative_method,
    });

    let result = CashRuleAnalysis {
        final_applicability: verdict.applicability(),
        verdict,
        cash_shortfall,
        payment_note,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, &assumptions, warnings, elapsed, result))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn above_threshold(output_tax: Money, cash_paid: Money, cumulative: bool) -> TaxPeriodInput {
        TaxPeriodInput {
            taxable_value: dec!(6_000_000),
            output_tax,
            available_itc: dec!(2_000_000),
            cash_paid,
            use_cumulative_method: cumulative,
            ..Default::default()
        }
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut input = above_threshold(dec!(1_000_000), dec!(0), true);
        input.taxable_value = TURNOVER_THRESHOLD;
        let v = evaluate(&input).unwrap();
        assert!(!v.applies_by_turnover);
        assert!(!v.is_applicable);
        assert_eq!(v.decided_by, DecisionBasis::ThresholdNotMet);
    }

    #[test]
    fn test_below_threshold_skips_exemption_scan() {
        let mut input = above_threshold(dec!(1_000_000), dec!(0), true);
        input.taxable_value = dec!(100);
        input.is_government_entity = true;
        let v = evaluate(&input).unwrap();
        assert!(v.exceptions.is_empty());
        assert_eq!(v.required_cash_amount, dec!(10_000));
        assert_eq!(v.max_usable_itc, dec!(990_000));
    }

    #[test]
    fn test_cumulative_requirement_includes_prior_months() {
        let mut input = above_threshold(dec!(1_000_000), dec!(15_000), true);
        input.cum_output_tax_prev_months = Some(dec!(2_000_000));
        let v = evaluate(&input).unwrap();
        assert_eq!(v.required_cash_amount, dec!(30_000));
        assert_eq!(v.min_additional_cash_required, dec!(15_000));
        assert_eq!(v.max_usable_itc, dec!(985_000));
        assert!(v.is_applicable);
    }

    #[test]
    fn test_single_month_ignores_cumulative_figure() {
        let mut input = above_threshold(dec!(1_000_000), dec!(0), false);
        input.cum_output_tax_prev_months = Some(dec!(9_000_000));
        let v = evaluate(&input).unwrap();
        assert_eq!(v.required_cash_amount, dec!(10_000));
    }

    #[test]
    fn test_min_additional_cash_clamped_to_output_tax() {
        // A large prior-year base can demand more than this month's liability.
        let mut input = above_threshold(dec!(1_000), dec!(0), true);
        input.cum_output_tax_prev_months = Some(dec!(50_000_000));
        let v = evaluate(&input).unwrap();
        assert_eq!(v.required_cash_amount, dec!(500_010));
        assert_eq!(v.min_additional_cash_required, dec!(1_000));
        assert_eq!(v.max_usable_itc, dec!(0));
    }

    #[test]
    fn test_exemptions_listed_in_fixed_order() {
        let mut input = above_threshold(dec!(1_000_000), dec!(0), true);
        input.is_first_return_after_registration = true;
        input.is_government_entity = true;
        input.income_tax_paid_prior_two_years = dec!(100_001);
        input.refund_prior_year = Some(dec!(100_001));
        let v = evaluate(&input).unwrap();
        let expected: Vec<String> = Exemption::ALL
            .iter()
            .map(|e| e.remark().to_string())
            .collect();
        assert_eq!(v.exceptions, expected);
        assert_eq!(v.decided_by, DecisionBasis::Exempt);
        assert!(v.reason.contains(Exemption::FirstReturn.remark()));
    }

    #[test]
    fn test_exemption_limits_are_strict() {
        let mut input = above_threshold(dec!(1_000_000), dec!(0), true);
        input.income_tax_paid_prior_two_years = INCOME_TAX_EXCEPTION_LIMIT;
        input.refund_prior_year = Some(REFUND_EXCEPTION_LIMIT);
        let v = evaluate(&input).unwrap();
        assert!(v.exceptions.is_empty());
        assert!(v.is_applicable);
    }

    #[test]
    fn test_refund_flag_alone_triggers_refund_exception() {
        let mut input = above_threshold(dec!(1_000_000), dec!(0), true);
        input.received_inverted_duty_refund = true;
        let v = evaluate(&input).unwrap();
        assert_eq!(v.exceptions, vec![Exemption::Refund.remark().to_string()]);
        assert!(!v.is_applicable);
    }

    #[test]
    fn test_zero_liability_satisfies_cash_test() {
        let input = above_threshold(dec!(0), dec!(0), false);
        let v = evaluate(&input).unwrap();
        assert_eq!(v.decided_by, DecisionBasis::CashTestSatisfied);
        assert_eq!(v.max_usable_itc, dec!(0));
    }

    #[test]
    fn test_negative_money_rejected_before_evaluation() {
        let input = above_threshold(dec!(-1), dec!(0), false);
        match evaluate(&input) {
            Err(CashRuleError::InvalidInput { field, .. }) => assert_eq!(field, "output_tax"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_cumulative_base_overflow_is_an_error() {
        let mut input = above_threshold(Decimal::MAX, dec!(0), true);
        input.cum_output_tax_prev_months = Some(Decimal::MAX);
        match evaluate(&input) {
            Err(CashRuleError::InvalidInput { field, .. }) => {
                assert_eq!(field, "cum_output_tax_prev_months")
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_max_single_month_liability_evaluates() {
        let mut input = above_threshold(Decimal::MAX, Decimal::MAX, false);
        input.cum_output_tax_prev_months = Some(Decimal::MAX);
        let v = evaluate(&input).unwrap();
        assert_eq!(v.decided_by, DecisionBasis::CashTestSatisfied);
        assert_eq!(v.min_additional_cash_required, dec!(0));
        assert_eq!(v.max_usable_itc, Decimal::MAX);
    }

    #[test]
    fn test_remarks_end_with_reason() {
        let mut input = above_threshold(dec!(1_000_000), dec!(0), true);
        input.is_government_entity = true;
        let v = evaluate(&input).unwrap();
        let remarks = v.remarks();
        assert_eq!(remarks.len(), 2);
        assert_eq!(remarks.last(), Some(&v.reason));
    }

    #[test]
    fn test_analyze_reports_shortfall_note() {
        let input = above_threshold(dec!(1_000_000), dec!(4_000), true);
        let out = analyze(&input).unwrap();
        assert_eq!(out.result.final_applicability, Applicability::Applicable);
        assert_eq!(out.result.cash_shortfall, dec!(6_000));
        assert!(out.result.payment_note.contains("Shortfall = ₹6,000.00"));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_analyze_warns_when_itc_balance_short() {
        let mut input = above_threshold(dec!(1_000_000), dec!(10_000), false);
        input.available_itc = dec!(500_000);
        input.cum_output_tax_prev_months = Some(dec!(1));
        let out = analyze(&input).unwrap();
        assert_eq!(out.warnings.len(), 2);
        assert!(out.result.payment_note.starts_with("Already paid"));
    }

    #[test]
    fn test_applicability_serializes_with_space() {
        let json = serde_json::to_value(Applicability::NotApplicable).unwrap();
        assert_eq!(json, serde_json::json!("NOT APPLICABLE"));
    }
}

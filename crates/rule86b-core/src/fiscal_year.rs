use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CashRuleError;
use crate::evaluator::{evaluate, Applicability, DecisionBasis};
use crate::input::{deserialize_flag, TaxPeriodInput};
use crate::types::*;
use crate::CashRuleResult;

const MAX_MONTHS: usize = 12;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Figures declared in one monthly return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyFiling {
    pub label: String,
    pub taxable_value: Money,
    pub output_tax: Money,
    #[serde(default)]
    pub available_itc: Money,
    /// Cash paid towards this month's liability.
    pub cash_paid: Money,
}

/// Taxpayer facts that hold for the whole year.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExemptionProfile {
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_government_entity: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub received_zero_rated_refund: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub received_inverted_duty_refund: bool,
    #[serde(default)]
    pub refund_prior_year: Option<Money>,
    #[serde(default)]
    pub income_tax_paid_prior_two_years: Money,
    /// Label of the first return filed after registration, if it falls in
    /// this year.
    #[serde(default)]
    pub first_return_label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiscalYearInput {
    pub fiscal_year: String,
    #[serde(default)]
    pub profile: ExemptionProfile,
    pub months: Vec<MonthlyFiling>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyVerdict {
    pub label: String,
    pub cum_output_tax_prev_months: Money,
    pub cum_cash_paid_prev_months: Money,
    pub required_cash_amount: Money,
    pub min_additional_cash_required: Money,
    pub max_usable_itc: Money,
    pub final_applicability: Applicability,
    pub decided_by: DecisionBasis,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiscalYearOutput {
    pub fiscal_year: String,
    pub total_output_tax: Money,
    pub total_cash_paid: Money,
    /// Cash share of the year's output tax (0 when no liability).
    pub cash_ratio: Rate,
    pub months_applicable: usize,
    pub months: Vec<MonthlyVerdict>,
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

fn running_total_overflow(label: &str, field: &str) -> CashRuleError {
    CashRuleError::invalid(
        &format!("{}.{}", label, field),
        "year-to-date total exceeds the representable range",
    )
}

/// Run the cumulative 1% test month by month through a fiscal year.
///
/// Month k is evaluated with the output tax and cash of months before k as
/// its year-to-date figures.
pub fn evaluate_fiscal_year(
    input: &FiscalYearInput,
) -> CashRuleResult<ComputationOutput<FiscalYearOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.months.is_empty() {
        return Err(CashRuleError::InsufficientData(
            "At least one monthly filing is required".to_string(),
        ));
    }
    if input.months.len() > MAX_MONTHS {
        return Err(CashRuleError::invalid(
            "months",
            format!(
                "a fiscal year has at most {} returns, got {}",
                MAX_MONTHS,
                input.months.len()
            ),
        ));
    }

    if let Some(label) = &input.profile.first_return_label {
        if !input.months.iter().any(|m| &m.label == label) {
            warnings.push(format!(
                "First return '{}' does not match any month label; ignored.",
                label
            ));
        }
    }

    let mut cum_output_tax = Decimal::ZERO;
    let mut cum_cash_paid = Decimal::ZERO;
    let mut months: Vec<MonthlyVerdict> = Vec::with_capacity(input.months.len());

    for month in &input.months {
        // period.cash_paid carries the prior total, so this month's cash is checked here.
        if month.cash_paid.is_sign_negative() && !month.cash_paid.is_zero() {
            return Err(CashRuleError::invalid(
                &format!("{}.cash_paid", month.label),
                "must be non-negative",
            ));
        }

        let period = TaxPeriodInput {
            taxable_value: month.taxable_value,
            output_tax: month.output_tax,
            available_itc: month.available_itc,
            cash_paid: cum_cash_paid,
            cum_output_tax_prev_months: Some(cum_output_tax),
            refund_prior_year: input.profile.refund_prior_year,
            is_government_entity: input.profile.is_government_entity,
            is_first_return_after_registration: input.profile.first_return_label.as_deref()
                == Some(month.label.as_str()),
            received_zero_rated_refund: input.profile.received_zero_rated_refund,
            received_inverted_duty_refund: input.profile.received_inverted_duty_refund,
            income_tax_paid_prior_two_years: input.profile.income_tax_paid_prior_two_years,
            use_cumulative_method: true,
        };

        let verdict = evaluate(&period).map_err(|e| match e {
            CashRuleError::InvalidInput { field, reason } => CashRuleError::InvalidInput {
                field: format!("{}.{}", month.label, field),
                reason,
            },
            other => other,
        })?;

        months.push(MonthlyVerdict {
            label: month.label.clone(),
            cum_output_tax_prev_months: cum_output_tax,
            cum_cash_paid_prev_months: cum_cash_paid,
            required_cash_amount: verdict.required_cash_amount,
            min_additional_cash_required: verdict.min_additional_cash_required,
            max_usable_itc: verdict.max_usable_itc,
            final_applicability: verdict.applicability(),
            decided_by: verdict.decided_by,
            reason: verdict.reason,
        });

        cum_output_tax = cum_output_tax
            .checked_add(month.output_tax)
            .ok_or_else(|| running_total_overflow(&month.label, "output_tax"))?;
        cum_cash_paid = cum_cash_paid
            .checked_add(month.cash_paid)
            .ok_or_else(|| running_total_overflow(&month.label, "cash_paid"))?;
    }

    let months_applicable = months
        .iter()
        .filter(|m| m.final_applicability == Applicability::Applicable)
        .count();

    let cash_ratio = if cum_output_tax > Decimal::ZERO {
        cum_cash_paid.checked_div(cum_output_tax).ok_or_else(|| {
            CashRuleError::invalid(
                "months",
                "cash paid is too large relative to output tax to express as a ratio",
            )
        })?
    } else {
        Decimal::ZERO
    };

    let result = FiscalYearOutput {
        fiscal_year: input.fiscal_year.clone(),
        total_output_tax: cum_output_tax,
        total_cash_paid: cum_cash_paid,
        cash_ratio,
        months_applicable,
        months,
    };

    let assumptions = serde_json::json!({
        "fiscal_year": input.fiscal_year,
        "num_months": input.months.len(),
        "cash_paid_basis": "cumulative through previous month",
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Rule 86B cumulative 1% cash test applied month by month across the fiscal year",
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::evaluator::{evaluate, Applicability, Verdict};
use crate::input::TaxPeriodInput;
use crate::types::Money;
use crate::CashRuleResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input record as exported, with optional figures resolved to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportInputs {
    pub taxable_value: Money,
    pub output_tax: Money,
    pub available_itc: Money,
    pub cash_paid: Money,
    pub cum_output_tax_prev_months: Money,
    pub refund_prior_year: Money,
    pub income_tax_paid_prior_two_years: Money,
    pub is_government_entity: bool,
    pub is_first_return_after_registration: bool,
    pub received_zero_rated_refund: bool,
    pub received_inverted_duty_refund: bool,
    pub use_cumulative_method: bool,
}

/// A single exported input value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Particular {
    Amount(Money),
    Flag(bool),
}

impl From<&TaxPeriodInput> for ReportInputs {
    fn from(input: &TaxPeriodInput) -> Self {
        ReportInputs {
            taxable_value: input.taxable_value,
            output_tax: input.output_tax,
            available_itc: input.available_itc,
            cash_paid: input.cash_paid,
            cum_output_tax_prev_months: input.cum_output_tax_prev(),
            refund_prior_year: input.refund_prior(),
            income_tax_paid_prior_two_years: input.income_tax_paid_prior_two_years,
            is_government_entity: input.is_government_entity,
            is_first_return_after_registration: input.is_first_return_after_registration,
            received_zero_rated_refund: input.received_zero_rated_refund,
            received_inverted_duty_refund: input.received_inverted_duty_refund,
            use_cumulative_method: input.use_cumulative_method,
        }
    }
}

impl ReportInputs {
    /// Field names and values in export order.
    pub fn particulars(&self) -> Vec<(&'static str, Particular)> {
        use Particular::*;

        vec![
            ("taxable_value", Amount(self.taxable_value)),
            ("output_tax", Amount(self.output_tax)),
            ("available_itc", Amount(self.available_itc)),
            ("cash_paid", Amount(self.cash_paid)),
            (
                "cum_output_tax_prev_months",
                Amount(self.cum_output_tax_prev_months),
            ),
            ("refund_prior_year", Amount(self.refund_prior_year)),
            (
                "income_tax_paid_prior_two_years",
                Amount(self.income_tax_paid_prior_two_years),
            ),
            ("is_government_entity", Flag(self.is_government_entity)),
            (
                "is_first_return_after_registration",
                Flag(self.is_first_return_after_registration),
            ),
            (
                "received_zero_rated_refund",
                Flag(self.received_zero_rated_refund),
            ),
            (
                "received_inverted_duty_refund",
                Flag(self.received_inverted_duty_refund),
            ),
            ("use_cumulative_method", Flag(self.use_cumulative_method)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportComputations {
    pub required_cash_amount: Money,
    pub min_additional_cash_required: Money,
    pub max_usable_itc: Money,
}

impl ReportComputations {
    pub fn rows(&self) -> [(&'static str, Money); 3] {
        [
            ("required_cash_amount", self.required_cash_amount),
            (
                "min_additional_cash_required",
                self.min_additional_cash_required,
            ),
            ("max_usable_itc", self.max_usable_itc),
        ]
    }
}

/// The JSON compliance document handed to every exporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub brand: String,
    pub timestamp: NaiveDateTime,
    pub inputs: ReportInputs,
    pub computations: ReportComputations,
    pub final_applicability: Applicability,
    /// Exception remarks, then the reason.
    pub remarks: Vec<String>,
}

impl ComplianceReport {
    pub fn assemble(
        input: &TaxPeriodInput,
        verdict: &Verdict,
        brand: &str,
        generated_at: NaiveDateTime,
    ) -> Self {
        ComplianceReport {
            brand: brand.to_string(),
            timestamp: generated_at,
            inputs: ReportInputs::from(input),
            computations: ReportComputations {
                required_cash_amount: verdict.required_cash_amount,
                min_additional_cash_required: verdict.min_additional_cash_required,
                max_usable_itc: verdict.max_usable_itc,
            },
            final_applicability: verdict.applicability(),
            remarks: verdict.remarks(),
        }
    }

    pub fn to_json_pretty(&self) -> CashRuleResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Evaluate `input` and assemble its compliance document.
pub fn generate_report(
    input: &TaxPeriodInput,
    brand: &str,
    generated_at: NaiveDateTime,
) -> CashRuleResult<ComplianceReport> {
    let verdict = evaluate(input)?;
    Ok(ComplianceReport::assemble(input, &verdict, brand, generated_at))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

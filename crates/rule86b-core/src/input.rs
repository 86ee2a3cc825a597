use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

use crate::error::CashRuleError;
use crate::types::Money;
use crate::CashRuleResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Declared figures and exemption facts for one monthly return.
///
/// In cumulative mode `cash_paid` is the cash paid in the fiscal year up to
/// the previous month, and `cum_output_tax_prev_months` the output tax over
/// the same span. In single-month mode `cash_paid` is this month's cash and
/// the cumulative figure is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxPeriodInput {
    /// Outward taxable supplies for the month, excluding exempt and zero-rated.
    pub taxable_value: Money,
    /// This month's output tax liability (CGST + SGST + IGST).
    pub output_tax: Money,
    /// Electronic credit ledger balance. Reported only.
    pub available_itc: Money,
    pub cash_paid: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cum_output_tax_prev_months: Option<Money>,
    /// Refund of unutilised ITC (zero-rated or inverted duty) received in the
    /// previous fiscal year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund_prior_year: Option<Money>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_government_entity: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_first_return_after_registration: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub received_zero_rated_refund: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub received_inverted_duty_refund: bool,
    #[serde(default)]
    pub income_tax_paid_prior_two_years: Money,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub use_cumulative_method: bool,
}

impl TaxPeriodInput {
    /// Every money field with its wire name, optional ones resolved to zero.
    pub fn money_fields(&self) -> [(&'static str, Money); 7] {
        [
            ("taxable_value", self.taxable_value),
            ("output_tax", self.output_tax),
            ("available_itc", self.available_itc),
            ("cash_paid", self.cash_paid),
            ("cum_output_tax_prev_months", self.cum_output_tax_prev()),
            ("refund_prior_year", self.refund_prior()),
            (
                "income_tax_paid_prior_two_years",
                self.income_tax_paid_prior_two_years,
            ),
        ]
    }

    /// Reject the record if any money field is negative.
    pub fn validate(&self) -> CashRuleResult<()> {
        for (field, value) in self.money_fields() {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(CashRuleError::invalid(
                    field,
                    format!("must be non-negative, got {}", value),
                ));
            }
        }
        Ok(())
    }

    /// Prior-month cumulative output tax; absent means first month of the year.
    pub fn cum_output_tax_prev(&self) -> Money {
        self.cum_output_tax_prev_months.unwrap_or(Decimal::ZERO)
    }

    pub fn refund_prior(&self) -> Money {
        self.refund_prior_year.unwrap_or(Decimal::ZERO)
    }
}

// ---------------------------------------------------------------------------
// Primitive parsing
// ---------------------------------------------------------------------------

fn flag_from_text(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Some(true),
        "n" | "no" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// Normalise a yes/no answer (`Y`, `n`, `yes`, `false`, `1`, ...) to a bool.
pub fn parse_flag(field: &str, text: &str) -> CashRuleResult<bool> {
    flag_from_text(text).ok_or_else(|| {
        CashRuleError::invalid(field, format!("'{}' is not a yes/no answer", text.trim()))
    })
}

/// Parse a non-negative rupee amount. Tolerates a leading `₹` and `,`/`_`
/// digit separators.
pub fn parse_money(field: &str, text: &str) -> CashRuleResult<Money> {
    let trimmed = text.trim();
    let cleaned: String = trimmed
        .trim_start_matches('₹')
        .chars()
        .filter(|c| *c != ',' && *c != '_' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Err(CashRuleError::invalid(field, "an amount is required"));
    }

    let value = Decimal::from_str(&cleaned).map_err(|_| {
        CashRuleError::invalid(field, format!("'{}' is not a valid amount", trimmed))
    })?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(CashRuleError::invalid(
            field,
            format!("must be non-negative, got {}", value),
        ));
    }
    Ok(value)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagRepr {
    Bool(bool),
    Number(i64),
    Text(String),
}

pub(crate) fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match FlagRepr::deserialize(deserializer)? {
        FlagRepr::Bool(b) => Ok(b),
        FlagRepr::Number(1) => Ok(true),
        FlagRepr::Number(0) => Ok(false),
        FlagRepr::Number(n) => Err(serde::de::Error::custom(format!(
            "{} is not a yes/no value",
            n
        ))),
        FlagRepr::Text(s) => flag_from_text(&s).ok_or_else(|| {
            serde::de::Error::custom(format!("'{}' is not a yes/no value", s))
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_flag_accepts_console_answers() {
        assert!(parse_flag("govt", "Y").unwrap());
        assert!(parse_flag("govt", " yes ").unwrap());
        assert!(!parse_flag("govt", "n").unwrap());
        assert!(!parse_flag("govt", "FALSE").unwrap());
    }

    #[test]
    fn test_parse_flag_rejects_other_text() {
        let err = parse_flag("first_return", "maybe").unwrap_err();
        match err {
            CashRuleError::InvalidInput { field, .. } => assert_eq!(field, "first_return"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_money_strips_separators() {
        assert_eq!(parse_money("x", "₹50,00,000").unwrap(), dec!(5_000_000));
        assert_eq!(parse_money("x", "1_000.50").unwrap(), dec!(1000.50));
        assert_eq!(parse_money("x", "0").unwrap(), dec!(0));
    }

    #[test]
    fn test_parse_money_rejects_negative_and_garbage() {
        assert!(parse_money("cash_paid", "-1").is_err());
        assert!(parse_money("cash_paid", "abc").is_err());
        assert!(parse_money("cash_paid", "  ").is_err());
    }

    #[test]
    fn test_validate_names_negative_field() {
        let input = TaxPeriodInput {
            taxable_value: dec!(6_000_000),
            output_tax: dec!(100_000),
            cum_output_tax_prev_months: Some(dec!(-5)),
            ..Default::default()
        };
        let err = input.validate().unwrap_err();
        match err {
            CashRuleError::InvalidInput { field, .. } => {
                assert_eq!(field, "cum_output_tax_prev_months")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_deserialize_flags_from_mixed_json() {
        let json = serde_json::json!({
            "taxable_value": "6000000",
            "output_tax": "1000000",
            "available_itc": "0",
            "cash_paid": "0",
            "is_government_entity": "Y",
            "is_first_return_after_registration": false,
            "received_zero_rated_refund": 0,
            "use_cumulative_method": "yes"
        });
        let input: TaxPeriodInput = serde_json::from_value(json).unwrap();
        assert!(input.is_government_entity);
        assert!(!input.is_first_return_after_registration);
        assert!(!input.received_zero_rated_refund);
        assert!(!input.received_inverted_duty_refund);
        assert!(input.use_cumulative_method);
        assert_eq!(input.cum_output_tax_prev(), dec!(0));
    }

    #[test]
    fn test_deserialize_rejects_unresolvable_flag() {
        let json = serde_json::json!({
            "taxable_value": "1",
            "output_tax": "1",
            "available_itc": "0",
            "cash_paid": "0",
            "is_government_entity": "perhaps"
        });
        let result: Result<TaxPeriodInput, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }
}

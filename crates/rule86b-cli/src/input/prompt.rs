use std::io::{BufRead, Write};

use rule86b_core::input::{parse_flag, parse_money};
use rule86b_core::{CashRuleError, Money, TaxPeriodInput};

const MAX_ATTEMPTS: usize = 3;

/// Console question-and-answer collection of a `TaxPeriodInput`.
///
/// Each answer is validated as it is typed; a bad answer is reported and
/// the question repeated, up to three attempts.
pub struct Prompter<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Prompter { reader, writer }
    }

    fn ask(&mut self, question: &str) -> Result<String, Box<dyn std::error::Error>> {
        write!(self.writer, "{}: ", question)?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err("input ended before all questions were answered".into());
        }
        Ok(line.trim().to_string())
    }

    fn retry<T>(
        &mut self,
        question: &str,
        parse: impl Fn(&str) -> Result<T, CashRuleError>,
    ) -> Result<T, Box<dyn std::error::Error>> {
        let mut last_error = None;
        for _ in 0..MAX_ATTEMPTS {
            let answer = self.ask(question)?;
            match parse(&answer) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    writeln!(self.writer, "  {}", e)?;
                    tracing::debug!(error = %e, "rejected console answer");
                    last_error = Some(e);
                }
            }
        }
        match last_error {
            Some(e) => Err(e.into()),
            None => Err("no answer given".into()),
        }
    }

    pub fn money(
        &mut self,
        field: &str,
        question: &str,
    ) -> Result<Money, Box<dyn std::error::Error>> {
        self.retry(&format!("{} (₹)", question), |text| parse_money(field, text))
    }

    pub fn flag(&mut self, field: &str, question: &str) -> Result<bool, Box<dyn std::error::Error>> {
        self.retry(&format!("{} (Y/N)", question), |text| parse_flag(field, text))
    }

    pub fn collect(&mut self) -> Result<TaxPeriodInput, Box<dyn std::error::Error>> {
        writeln!(self.writer, "\n========== RULE 86B CALCULATOR ==========\n")?;

        let taxable_value = self.money(
            "taxable_value",
            "Taxable value of outward supplies for the month",
        )?;
        let output_tax = self.money("output_tax", "This month's output tax liability")?;
        let available_itc = self.money("available_itc", "Available ITC balance")?;
        let use_cumulative_method = self.flag(
            "use_cumulative_method",
            "Use the cumulative (FY-to-date) 1% test?",
        )?;

        let (cum_output_tax_prev_months, cash_paid) = if use_cumulative_method {
            let cum = self.money(
                "cum_output_tax_prev_months",
                "Cumulative output tax in the FY till previous month",
            )?;
            let cash = self.money(
                "cash_paid",
                "Cumulative cash paid in the FY till previous month",
            )?;
            (Some(cum), cash)
        } else {
            (None, self.money("cash_paid", "Cash already paid this month")?)
        };

        writeln!(self.writer, "\n----- Statutory exemptions -----")?;

        let is_government_entity = self.flag(
            "is_government_entity",
            "Is the taxpayer a Government department, PSU or local body?",
        )?;
        let received_zero_rated_refund = self.flag(
            "received_zero_rated_refund",
            "Refund received on zero-rated supplies in the previous FY?",
        )?;
        let received_inverted_duty_refund = self.flag(
            "received_inverted_duty_refund",
            "Refund received due to inverted duty structure in the previous FY?",
        )?;
        let refund_prior_year = self.money(
            "refund_prior_year",
            "Refund of unutilised ITC received in the previous FY",
        )?;
        let income_tax_paid_prior_two_years = self.money(
            "income_tax_paid_prior_two_years",
            "Income tax paid in the last two financial years",
        )?;
        let is_first_return_after_registration = self.flag(
            "is_first_return_after_registration",
            "Is this the first return after registration?",
        )?;

        Ok(TaxPeriodInput {
            taxable_value,
            output_tax,
            available_itc,
            cash_paid,
            cum_output_tax_prev_months,
            refund_prior_year: Some(refund_prior_year),
            is_government_entity,
            is_first_return_after_registration,
            received_zero_rated_refund,
            received_inverted_duty_refund,
            income_tax_paid_prior_two_years,
            use_cumulative_method,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Cursor;

    fn collect_from(script: &str) -> (Result<TaxPeriodInput, String>, String) {
        let mut out = Vec::new();
        let result = Prompter::new(Cursor::new(script.to_string()), &mut out)
            .collect()
            .map_err(|e| e.to_string());
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_collects_single_month_answers() {
        let script = "60,00,000\n1000000\n500000\nN\n4000\nn\nN\nN\n0\n50000\nN\n";
        let (result, _) = collect_from(script);
        let input = result.unwrap();

        assert_eq!(input.taxable_value, dec!(6_000_000));
        assert_eq!(input.cash_paid, dec!(4_000));
        assert!(!input.use_cumulative_method);
        assert_eq!(input.cum_output_tax_prev_months, None);
        assert_eq!(input.income_tax_paid_prior_two_years, dec!(50_000));
    }

    #[test]
    fn test_reprompts_on_negative_amount() {
        let script = "-5\n6000000\n1000000\n0\nY\n0\n0\nY\nN\nN\n0\n0\nN\n";
        let (result, transcript) = collect_from(script);
        let input = result.unwrap();

        assert!(transcript.contains("must be non-negative"));
        assert!(input.is_government_entity);
        assert!(input.use_cumulative_method);
        assert_eq!(input.cum_output_tax_prev_months, Some(dec!(0)));
    }

    #[test]
    fn test_gives_up_after_three_bad_flags() {
        let script = "6000000\n1000000\n0\nmaybe\nperhaps\nsure\n";
        let (result, _) = collect_from(script);
        let err = result.unwrap_err();
        assert!(err.contains("use_cumulative_method"));
    }

    #[test]
    fn test_early_end_of_input_is_an_error() {
        let (result, _) = collect_from("6000000\n");
        assert!(result.unwrap_err().contains("input ended"));
    }
}

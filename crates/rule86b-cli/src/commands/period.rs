use clap::Args;
use rust_decimal::Decimal;

use rule86b_core::input::{parse_flag, parse_money};
use rule86b_core::TaxPeriodInput;

use crate::input;

fn money_arg(text: &str) -> Result<Decimal, String> {
    parse_money("amount", text).map_err(|e| e.to_string())
}

fn flag_arg(text: &str) -> Result<bool, String> {
    parse_flag("flag", text).map_err(|e| e.to_string())
}

/// Figures and exemption facts for one return, given as flags or a JSON file.
#[derive(Args, Debug, Default)]
#[command(allow_hyphen_values = true)]
pub struct PeriodArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Taxable value of outward supplies for the month
    #[arg(long, value_parser = money_arg)]
    pub taxable_value: Option<Decimal>,

    /// Output tax liability for the month
    #[arg(long, value_parser = money_arg)]
    pub output_tax: Option<Decimal>,

    /// Available ITC balance
    #[arg(long, alias = "itc", value_parser = money_arg)]
    pub available_itc: Option<Decimal>,

    /// Cash paid (this month, or FY-to-date till previous month with --cumulative)
    #[arg(long, value_parser = money_arg)]
    pub cash_paid: Option<Decimal>,

    /// Cumulative output tax in the FY till previous month
    #[arg(long, value_parser = money_arg)]
    pub cum_output_tax_prev: Option<Decimal>,

    /// Refund of unutilised ITC received in the previous FY
    #[arg(long, value_parser = money_arg)]
    pub refund_prior_year: Option<Decimal>,

    /// Income tax paid in the two preceding FYs
    #[arg(long, value_parser = money_arg)]
    pub income_tax_prior_two_years: Option<Decimal>,

    /// Government department / PSU / local body (Y/N)
    #[arg(long, value_parser = flag_arg)]
    pub govt: Option<bool>,

    /// First return after registration (Y/N)
    #[arg(long, value_parser = flag_arg)]
    pub first_return: Option<bool>,

    /// Refund received on zero-rated supplies in the previous FY (Y/N)
    #[arg(long, value_parser = flag_arg)]
    pub zero_rated_refund: Option<bool>,

    /// Refund received for inverted duty structure in the previous FY (Y/N)
    #[arg(long, value_parser = flag_arg)]
    pub inverted_refund: Option<bool>,

    /// Use the cumulative FY-to-date 1% test
    #[arg(long)]
    pub cumulative: bool,
}

impl PeriodArgs {
    /// Build the input record from `--input`, piped stdin, or the flags.
    pub fn resolve(&self) -> Result<TaxPeriodInput, Box<dyn std::error::Error>> {
        if let Some(from_json) = input::load_json::<TaxPeriodInput>(self.input.as_deref())? {
            return Ok(from_json);
        }
        self.from_flags()
    }

    pub fn from_flags(&self) -> Result<TaxPeriodInput, Box<dyn std::error::Error>> {
        Ok(TaxPeriodInput {
            taxable_value: self
                .taxable_value
                .ok_or("--taxable-value is required (or provide --input)")?,
            output_tax: self
                .output_tax
                .ok_or("--output-tax is required (or provide --input)")?,
            available_itc: self.available_itc.unwrap_or(Decimal::ZERO),
            cash_paid: self
                .cash_paid
                .ok_or("--cash-paid is required (or provide --input)")?,
            cum_output_tax_prev_months: self.cum_output_tax_prev,
            refund_prior_year: self.refund_prior_year,
            is_government_entity: self.govt.unwrap_or(false),
            is_first_return_after_registration: self.first_return.unwrap_or(false),
            received_zero_rated_refund: self.zero_rated_refund.unwrap_or(false),
            received_inverted_duty_refund: self.inverted_refund.unwrap_or(false),
            income_tax_paid_prior_two_years: self
                .income_tax_prior_two_years
                .unwrap_or(Decimal::ZERO),
            use_cumulative_method: self.cumulative,
        })
    }
}

use clap::Args;
use serde_json::Value;

use rule86b_core::fiscal_year::{self, FiscalYearInput};

use crate::input;

/// Arguments for a month-by-month fiscal year walk
#[derive(Args)]
pub struct FiscalYearArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_fiscal_year(args: FiscalYearArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let fy_input: FiscalYearInput = input::load_json(args.input.as_deref())?
        .ok_or("--input <file.json> or stdin required for the fiscal year walk")?;
    let result = fiscal_year::evaluate_fiscal_year(&fy_input)?;
    tracing::info!(
        fiscal_year = %result.result.fiscal_year,
        months_applicable = result.result.months_applicable,
        "evaluated fiscal year"
    );
    Ok(serde_json::to_value(result)?)
}

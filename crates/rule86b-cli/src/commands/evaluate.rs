use clap::Args;
use serde_json::Value;

use rule86b_core::evaluator;

use super::period::PeriodArgs;

/// Arguments for a single Rule 86B applicability check
#[derive(Args)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub period: PeriodArgs,
}

pub fn run_evaluate(args: EvaluateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = args.period.resolve()?;
    let result = evaluator::analyze(&input)?;
    tracing::info!(
        applicability = %result.result.final_applicability,
        decided_by = ?result.result.verdict.decided_by,
        "evaluated return"
    );
    Ok(serde_json::to_value(result)?)
}

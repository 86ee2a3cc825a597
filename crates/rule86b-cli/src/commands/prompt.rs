use clap::Args;
use serde_json::Value;
use std::io;

use rule86b_core::evaluator;

use crate::input::prompt::Prompter;
use crate::input::stdin;

/// Arguments for the interactive questionnaire
#[derive(Args)]
pub struct PromptArgs {
    /// Ask questions even when stdin is not a terminal
    #[arg(long)]
    pub force: bool,
}

pub fn run_prompt(args: PromptArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if !args.force && !stdin::is_interactive() {
        return Err("stdin is not a terminal; pipe JSON to `r86b evaluate` or pass --force".into());
    }

    let stdin = io::stdin();
    let input = Prompter::new(stdin.lock(), io::stderr()).collect()?;
    let result = evaluator::analyze(&input)?;
    Ok(serde_json::to_value(result)?)
}

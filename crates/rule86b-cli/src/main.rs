mod commands;
mod config;
mod input;
mod output;
mod telemetry;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::evaluate::EvaluateArgs;
use commands::fiscal_year::FiscalYearArgs;
use commands::prompt::PromptArgs;
use commands::report::ReportArgs;
use config::CliConfig;

/// Rule 86B applicability checks and compliance reports
#[derive(Parser)]
#[command(
    name = "r86b",
    version,
    about = "Rule 86B minimum-cash applicability checks",
    long_about = "Decide whether Rule 86B (1% of output tax in cash) restricts ITC \
                  utilisation for a monthly GST return, using the turnover threshold, \
                  the single-month or cumulative cash test and the statutory \
                  exemptions, and export the result as JSON, CSV and a printable page."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log filter (overrides R86B_LOG_LEVEL; RUST_LOG wins over both)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one return from flags, a JSON file or stdin
    Evaluate(EvaluateArgs),
    /// Answer console questions, then evaluate
    Prompt(PromptArgs),
    /// Evaluate and export JSON, CSV sections and a printable page
    Report(ReportArgs),
    /// Run the cumulative test month by month across a fiscal year
    FiscalYear(FiscalYearArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    let config = CliConfig::load();

    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    if let Err(e) = telemetry::init(level) {
        eprintln!("{}: {}", "error".red().bold(), e);
        process::exit(1);
    }

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Evaluate(args) => commands::evaluate::run_evaluate(args),
        Commands::Prompt(args) => commands::prompt::run_prompt(args),
        Commands::Report(args) => commands::report::run_report(args, &config),
        Commands::FiscalYear(args) => commands::fiscal_year::run_fiscal_year(args),
        Commands::Version => {
            println!("r86b {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

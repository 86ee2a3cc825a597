use clap::Args;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use rule86b_core::evaluator;
use rule86b_core::report::{png_dimensions, ComplianceReport, PrintableReport, TabularReport};

use super::period::PeriodArgs;
use crate::config::CliConfig;

/// Arguments for report export
#[derive(Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub period: PeriodArgs,

    /// Directory to write the report files into
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// File name stem shared by every export
    #[arg(long, default_value = "rule86b_report")]
    pub stem: String,

    /// Brand shown in the report header
    #[arg(long)]
    pub brand: Option<String>,

    /// PNG logo used as a faint page watermark
    #[arg(long)]
    pub logo: Option<PathBuf>,
}

/// What the export step managed to write.
#[derive(Debug, Default, Serialize)]
pub struct ExportSummary {
    pub files_written: Vec<String>,
    pub failures: Vec<String>,
    pub watermark: bool,
}

impl ExportSummary {
    fn record(&mut self, path: &Path, outcome: Result<(), Box<dyn std::error::Error>>) {
        match outcome {
            Ok(()) => {
                info!(path = %path.display(), "wrote export");
                self.files_written.push(path.display().to_string());
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "export failed");
                self.failures.push(format!("{}: {}", path.display(), e));
            }
        }
    }
}

fn write_json(path: &Path, report: &ComplianceReport) -> Result<(), Box<dyn std::error::Error>> {
    fs::write(path, report.to_json_pretty()?)?;
    Ok(())
}

fn write_section_csv(
    path: &Path,
    header: &[String],
    rows: &[Vec<String>],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(header)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Logo pixel size, or `None` when the file is missing or not a PNG.
fn read_logo(path: &Path) -> Option<(u32, u32)> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "logo not found; skipping watermark");
            return None;
        }
    };
    match png_dimensions(&bytes) {
        Ok(dims) => Some(dims),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unusable logo; skipping watermark");
            None
        }
    }
}

/// Write the JSON document, one CSV per tabular section and the printable
/// page. A failed write is recorded and the remaining exports still run.
pub fn write_exports(
    report: &ComplianceReport,
    out_dir: &Path,
    stem: &str,
    logo: Option<&Path>,
) -> ExportSummary {
    let mut summary = ExportSummary::default();

    let json_path = out_dir.join(format!("{}.json", stem));
    summary.record(&json_path, write_json(&json_path, report));

    let table = TabularReport::from_report(report);
    for section in &table.sections {
        let path = out_dir.join(format!(
            "{}_{}.csv",
            stem,
            section.name.to_ascii_lowercase()
        ));
        summary.record(&path, write_section_csv(&path, &section.header, &section.rows));
    }

    let logo_dims = logo.and_then(read_logo);
    let page = PrintableReport::from_report(report, logo_dims);
    summary.watermark = page.watermark.is_some();

    let text_path = out_dir.join(format!("{}.txt", stem));
    summary.record(
        &text_path,
        fs::write(&text_path, page.render_text()).map_err(|e| e.into()),
    );

    summary
}

pub fn run_report(args: ReportArgs, config: &CliConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let input = args.period.resolve()?;
    let verdict = evaluator::evaluate(&input)?;

    let brand = args.brand.as_deref().unwrap_or(&config.brand);
    let generated_at = chrono::Local::now().naive_local();
    let report = ComplianceReport::assemble(&input, &verdict, brand, generated_at);

    let out_dir = args.out_dir.as_deref().unwrap_or(&config.output_dir);
    if let Err(e) = fs::create_dir_all(out_dir) {
        warn!(dir = %out_dir.display(), error = %e, "could not create output directory");
    }

    let logo = args.logo.as_deref().unwrap_or(&config.logo_path);
    let summary = write_exports(&report, out_dir, &args.stem, Some(logo));

    Ok(serde_json::json!({
        "result": {
            "final_applicability": report.final_applicability,
            "reason": verdict.reason,
            "files_written": summary.files_written,
            "failures": summary.failures,
            "watermark": summary.watermark,
        },
        "report": report,
    }))
}

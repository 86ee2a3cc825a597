use serde::{Deserialize, Serialize};

use super::document::{ComplianceReport, Particular};
use crate::types::Money;

/// One sheet of the tabular export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportSection {
    fn new(name: &str, header: &[&str]) -> Self {
        ReportSection {
            name: name.to_string(),
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }
}

/// Inputs, Computations, Summary and Remarks sections, in that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabularReport {
    pub sections: Vec<ReportSection>,
}

fn cell_amount(value: Money) -> String {
    format!("{:.2}", value.round_dp(2))
}

impl TabularReport {
    pub fn from_report(report: &ComplianceReport) -> Self {
        let mut inputs = ReportSection::new("Inputs", &["Particular", "Value"]);
        for (name, value) in report.inputs.particulars() {
            let cell = match value {
                Particular::Amount(v) => cell_amount(v),
                Particular::Flag(b) => b.to_string(),
            };
            inputs.push(vec![name.to_string(), cell]);
        }

        let mut computations = ReportSection::new("Computations", &["Computation", "Value"]);
        for (name, value) in report.computations.rows() {
            computations.push(vec![name.to_string(), cell_amount(value)]);
        }

        let mut summary = ReportSection::new("Summary", &["Result", "Timestamp"]);
        summary.push(vec![
            report.final_applicability.to_string(),
            report.timestamp.format("%Y-%m-%dT%H:%M:%S").to_string(),
        ]);

        let mut remarks = ReportSection::new("Remarks", &["Remarks"]);
        for remark in &report.remarks {
            remarks.push(vec![remark.clone()]);
        }

        TabularReport {
            sections: vec![inputs, computations, summary, remarks],
        }
    }

    pub fn section(&self, name: &str) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.name == name)
    }
}

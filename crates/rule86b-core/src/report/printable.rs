use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use super::document::{ComplianceReport, Particular};
use super::watermark::WatermarkPlacement;
use crate::types::format_inr;

/// A4 portrait in PostScript points.
pub const A4_WIDTH_PT: Decimal = dec!(595.28);
pub const A4_HEIGHT_PT: Decimal = dec!(841.89);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintSection {
    pub heading: String,
    pub lines: Vec<String>,
}

/// Single-page layout of the compliance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintableReport {
    pub title: String,
    pub generated_on: String,
    pub page_width: Decimal,
    pub page_height: Decimal,
    pub sections: Vec<PrintSection>,
    pub watermark: Option<WatermarkPlacement>,
}

fn humanize(field: &str) -> String {
    let mut label = field.replace('_', " ");
    if let Some(first) = label.get(..1) {
        let upper = first.to_ascii_uppercase();
        label.replace_range(..1, &upper);
    }
    label.replace("itc", "ITC").replace("Itc", "ITC")
}

impl PrintableReport {
    /// Lay out `report` on an A4 page. `logo` is the logo's pixel size when
    /// one could be read; without it the page carries no watermark.
    pub fn from_report(report: &ComplianceReport, logo: Option<(u32, u32)>) -> Self {
        let inputs = report
            .inputs
            .particulars()
            .into_iter()
            .map(|(name, value)| {
                let shown = match value {
                    Particular::Amount(v) => format_inr(v),
                    Particular::Flag(true) => "Yes".to_string(),
                    Particular::Flag(false) => "No".to_string(),
                };
                format!("{}: {}", humanize(name), shown)
            })
            .collect();

        let computations = report
            .computations
            .rows()
            .iter()
            .map(|(name, value)| format!("{}: {}", humanize(name), format_inr(*value)))
            .collect();

        let sections = vec![
            PrintSection {
                heading: "Inputs".to_string(),
                lines: inputs,
            },
            PrintSection {
                heading: "Computations".to_string(),
                lines: computations,
            },
            PrintSection {
                heading: "Result".to_string(),
                lines: vec![format!("Rule 86B: {}", report.final_applicability)],
            },
            PrintSection {
                heading: "Remarks".to_string(),
                lines: report.remarks.clone(),
            },
        ];

        PrintableReport {
            title: format!("{} — Rule 86B Compliance Report", report.brand),
            generated_on: format!(
                "Generated on: {}",
                report.timestamp.format("%Y-%m-%d %H:%M:%S")
            ),
            page_width: A4_WIDTH_PT,
            page_height: A4_HEIGHT_PT,
            sections,
            watermark: logo
                .and_then(|(w, h)| WatermarkPlacement::fit(w, h, A4_WIDTH_PT, A4_HEIGHT_PT)),
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        let _ = writeln!(out, "{}", self.generated_on);

        for section in &self.sections {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", section.heading);
            let _ = writeln!(out, "{}", "-".repeat(section.heading.chars().count()));
            for line in &section.lines {
                let _ = writeln!(out, "  {}", line);
            }
        }

        if let Some(wm) = &self.watermark {
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "[watermark {}x{} pt at ({}, {}), opacity {}]",
                wm.width, wm.height, wm.x, wm.y, wm.opacity
            );
        }
        out
    }
}

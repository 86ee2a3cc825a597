//! Export-ready views of a verdict: the JSON document, the sectioned table
//! and the printable page layout. Nothing here touches the filesystem or
//! the clock; callers supply the timestamp and any logo bytes.

pub mod document;
pub mod printable;
pub mod tabular;
pub mod watermark;

pub use document::{
    generate_report, ComplianceReport, Particular, ReportComputations, ReportInputs,
};
pub use printable::PrintableReport;
pub use tabular::{ReportSection, TabularReport};
pub use watermark::{png_dimensions, WatermarkPlacement};

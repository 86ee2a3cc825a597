use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Applicability
// ---------------------------------------------------------------------------

#[napi]
pub fn evaluate_rule86b(input_json: String) -> NapiResult<String> {
    let input: rule86b_core::TaxPeriodInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = rule86b_core::evaluator::analyze(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn evaluate_fiscal_year(input_json: String) -> NapiResult<String> {
    let input: rule86b_core::fiscal_year::FiscalYearInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        rule86b_core::fiscal_year::evaluate_fiscal_year(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// `timestamp` is ISO-8601 without offset, e.g. `2024-04-30T18:05:00`.
#[napi]
pub fn compliance_report(
    input_json: String,
    brand: String,
    timestamp: String,
) -> NapiResult<String> {
    let input: rule86b_core::TaxPeriodInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let generated_at: chrono::NaiveDateTime = timestamp.parse().map_err(to_napi_error)?;
    let report = rule86b_core::report::generate_report(&input, &brand, generated_at)
        .map_err(to_napi_error)?;
    report.to_json_pretty().map_err(to_napi_error)
}

#[napi]
pub fn report_tables(report_json: String) -> NapiResult<String> {
    let report: rule86b_core::report::ComplianceReport =
        serde_json::from_str(&report_json).map_err(to_napi_error)?;
    let table = rule86b_core::report::TabularReport::from_report(&report);
    serde_json::to_string(&table).map_err(to_napi_error)
}

#[napi]
pub fn printable_report(report_json: String) -> NapiResult<String> {
    let report: rule86b_core::report::ComplianceReport =
        serde_json::from_str(&report_json).map_err(to_napi_error)?;
    Ok(rule86b_core::report::PrintableReport::from_report(&report, None).render_text())
}

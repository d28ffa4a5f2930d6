//! JSON serialization for benchmark reports.

use crate::result::BenchReport;

/// Render a report as single-line JSON, suitable for log lines or NDJSON files.
///
/// # Errors
///
/// Propagates any error from `serde_json`.
pub fn to_json(report: &BenchReport) -> Result<String, serde_json::Error> {
    serde_json::to_string(report)
}

/// Render a report as indented JSON for saving next to other results.
///
/// # Errors
///
/// Propagates any error from `serde_json`.
pub fn to_json_pretty(report: &BenchReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

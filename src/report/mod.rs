// src/report/mod.rs
// =============================================================================
// Report output for a finished audit.
//
// Submodules:
// - csv_report: one row per issue, spreadsheet friendly
// - json_report: the full nested report
// - summary: table and counters for the terminal
// =============================================================================

mod csv_report;
mod json_report;
mod summary;

pub use csv_report::write_csv_report;
pub use json_report::{render_json, write_json_report};
pub use summary::print_summary;

pub const CSV_FILE_NAME: &str = "image-audit.csv";
pub const JSON_FILE_NAME: &str = "image-audit.json";

// src/report/csv_report.rs
// =============================================================================
// Tabular report: one row per issue.
//
// Quoting is left to the csv crate. A field that contains a comma or a quote
// is wrapped in quotes, with any inner quotes doubled. Other fields are
// written bare.
// =============================================================================

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::audit::Issue;

const HEADER: [&str; 5] = [
    "Page",
    "Broken Image URL",
    "Oversized Image URL",
    "Image Size (KB)",
    "Issue Type",
];

pub fn write_csv_report(path: &Path, issues: &[Issue]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_issues(file, issues).with_context(|| format!("writing {}", path.display()))
}

fn write_issues<W: Write>(out: W, issues: &[Issue]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(HEADER)?;

    for issue in issues {
        let size = issue.image_size_kb.map(|kb| kb.to_string()).unwrap_or_default();
        writer.write_record([
            issue.page.as_str(),
            issue.broken_image_url.as_deref().unwrap_or_default(),
            issue.oversized_image_url.as_deref().unwrap_or_default(),
            size.as_str(),
            issue.issue_type.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

// src/report/json_report.rs
// =============================================================================
// Structured report: the whole AuditReport as pretty-printed JSON.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};

use crate::audit::AuditReport;

pub fn render_json(report: &AuditReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn write_json_report(path: &Path, report: &AuditReport) -> Result<()> {
    let json = render_json(report)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{Issue, IssueType, StatsSnapshot};
    use chrono::Utc;

    #[test]
    fn test_report_shape() {
        let report = AuditReport {
            base_url: "https://example.com".to_string(),
            sitemap_url: "https://example.com/sitemap.xml".to_string(),
            generated_at: Utc::now(),
            issues_count: 1,
            issues: vec![Issue {
                page: "https://example.com/".to_string(),
                page_title: "Home".to_string(),
                issue_type: IssueType::Broken,
                broken_image_url: Some("/gone.png".to_string()),
                oversized_image_url: None,
                image_size_kb: None,
            }],
            stats: StatsSnapshot::default(),
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image-audit.json");
        write_json_report(&path, &report).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["baseUrl"], "https://example.com");
        assert_eq!(value["sitemapUrl"], "https://example.com/sitemap.xml");
        assert_eq!(value["issuesCount"], 1);
        assert_eq!(value["issues"][0]["brokenImageUrl"], "/gone.png");
        assert_eq!(value["issues"][0]["issueType"], "Broken");
        assert!(value["generatedAt"].as_str().unwrap().contains('T'));
        assert_eq!(value["stats"]["totalImagesChecked"], 0);
    }
}

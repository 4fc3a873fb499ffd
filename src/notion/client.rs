// src/notion/client.rs
// =============================================================================
// Pushes audit findings into a Notion database.
//
// Strategy:
// - Create one database under the configured parent page per run
// - Create one database row per issue, one request at a time
// - A failed row is logged and skipped; a failed database disables the sync
//
// Nothing here can fail the audit: by the time the sync runs, the reports are
// already on disk.
// =============================================================================

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use url::Url;

use crate::audit::{AuditReport, Issue, IssueType};
use crate::config::SyncConfig;

const NOTION_API: &str = "https://api.notion.com";
const NOTION_VERSION: &str = "2022-06-28";
const TITLE_FALLBACK_CHARS: usize = 60;

/// How many rows made it into Notion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub created: usize,
    pub failed: usize,
}

#[derive(Deserialize)]
struct CreatedObject {
    id: String,
}

pub struct NotionSync {
    client: Client,
    api_base: String,
    token: String,
    parent_page_id: String,
}

impl NotionSync {
    pub fn new(config: &SyncConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("building Notion HTTP client")?;

        Ok(Self {
            client,
            api_base: NOTION_API.to_string(),
            token: config.token.clone(),
            parent_page_id: config.parent_page_id.clone(),
        })
    }

    /// Points the client at another API host
    #[cfg(test)]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Syncs every issue of the report. Returns `None` when the database
    /// could not be created and nothing was attempted.
    pub async fn sync_report(&self, report: &AuditReport) -> Option<SyncSummary> {
        let title = format!(
            "Image audit: {} ({})",
            report.base_url,
            report.generated_at.format("%Y-%m-%d %H:%M UTC")
        );

        let database_id = match self.create_database(&title).await {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "could not create Notion database, sync skipped");
                return None;
            }
        };
        info!(database = %database_id, issues = report.issues.len(), "syncing issues to Notion");

        let mut summary = SyncSummary::default();
        for issue in &report.issues {
            match self.create_row(&database_id, issue).await {
                Ok(()) => summary.created += 1,
                Err(e) => {
                    warn!(page = %issue.page, image = issue.image_url(), error = %e, "Notion row skipped");
                    summary.failed += 1;
                }
            }
        }

        Some(summary)
    }

    async fn create_database(&self, title: &str) -> Result<String> {
        let body = json!({
            "parent": { "type": "page_id", "page_id": self.parent_page_id },
            "title": [{ "type": "text", "text": { "content": title } }],
            "properties": {
                "Title": { "title": {} },
                "Page": { "url": {} },
                "Issue Type": {
                    "select": {
                        "options": [
                            { "name": IssueType::Broken.as_str(), "color": "red" },
                            { "name": IssueType::Oversized.as_str(), "color": "orange" }
                        ]
                    }
                },
                "Broken Image URL": { "url": {} },
                "Oversized Image URL": { "url": {} },
                "Image": { "files": {} },
                "Size (KB)": { "number": { "format": "number" } }
            }
        });

        let created: CreatedObject = self.post("/v1/databases", &body).await?.json().await?;
        Ok(created.id)
    }

    async fn create_row(&self, database_id: &str, issue: &Issue) -> Result<()> {
        let body = json!({
            "parent": { "database_id": database_id },
            "properties": row_properties(issue)
        });
        self.post("/v1/pages", &body).await?;
        Ok(())
    }

    async fn post(&self, endpoint: &str, body: &Value) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(format!("{}{}", self.api_base, endpoint))
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(anyhow!("Notion API {} returned HTTP {}: {}", endpoint, status.as_u16(), detail));
        }
        Ok(response)
    }
}

/// Row title: the page title, or the start of the page URL when the page has none
pub fn row_title(issue: &Issue) -> String {
    let title = issue.page_title.trim();
    if title.is_empty() {
        issue.page.chars().take(TITLE_FALLBACK_CHARS).collect()
    } else {
        title.to_string()
    }
}

fn row_properties(issue: &Issue) -> Value {
    // Notion only accepts absolute URLs as external files
    let image_files: Vec<Value> = match Url::parse(issue.image_url()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            let name = url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .filter(|name| !name.is_empty())
                .unwrap_or("image");
            vec![json!({
                "name": name,
                "type": "external",
                "external": { "url": url.as_str() }
            })]
        }
        _ => Vec::new(),
    };

    json!({
        "Title": { "title": [{ "text": { "content": row_title(issue) } }] },
        "Page": { "url": issue.page },
        "Issue Type": { "select": { "name": issue.issue_type.as_str() } },
        "Broken Image URL": { "url": issue.broken_image_url },
        "Oversized Image URL": { "url": issue.oversized_image_url },
        "Image": { "files": image_files },
        "Size (KB)": { "number": issue.image_size_kb }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::StatsSnapshot;
    use chrono::Utc;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn issue(issue_type: IssueType, title: &str) -> Issue {
        let (broken, oversized, size) = match issue_type {
            IssueType::Broken => (Some("/gone.png".to_string()), None, None),
            IssueType::Oversized => (None, Some("https://example.com/big.jpg".to_string()), Some(586)),
        };
        Issue {
            page: "https://example.com/a-very-long-path/that-keeps-going/and-going/until-it-is-long".to_string(),
            page_title: title.to_string(),
            issue_type,
            broken_image_url: broken,
            oversized_image_url: oversized,
            image_size_kb: size,
        }
    }

    fn report(issues: Vec<Issue>) -> AuditReport {
        AuditReport {
            base_url: "https://example.com".to_string(),
            sitemap_url: "https://example.com/sitemap.xml".to_string(),
            generated_at: Utc::now(),
            issues_count: issues.len(),
            issues,
            stats: StatsSnapshot::default(),
        }
    }

    fn sync(server: &MockServer) -> NotionSync {
        let config = SyncConfig {
            token: "secret".to_string(),
            parent_page_id: "parent-1".to_string(),
        };
        NotionSync::new(&config).unwrap().with_api_base(server.uri())
    }

    #[test]
    fn test_row_title_fallback() {
        assert_eq!(row_title(&issue(IssueType::Broken, "Gallery")), "Gallery");

        let untitled = row_title(&issue(IssueType::Broken, "  "));
        assert_eq!(untitled.chars().count(), 60);
        assert!(untitled.starts_with("https://example.com/a-very-long-path"));
    }

    #[test]
    fn test_row_properties() {
        let props = row_properties(&issue(IssueType::Oversized, "Gallery"));
        assert_eq!(props["Issue Type"]["select"]["name"], "Oversized");
        assert_eq!(props["Size (KB)"]["number"], 586);
        assert!(props["Broken Image URL"]["url"].is_null());
        assert_eq!(props["Image"]["files"][0]["external"]["url"], "https://example.com/big.jpg");
        assert_eq!(props["Image"]["files"][0]["name"], "big.jpg");

        // Relative raw references cannot be attached as files
        let props = row_properties(&issue(IssueType::Broken, "Gallery"));
        assert_eq!(props["Image"]["files"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_failed_row_is_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/databases"))
            .and(header("authorization", "Bearer secret"))
            .and(header("notion-version", NOTION_VERSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "db-1" })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/pages"))
            .and(body_partial_json(json!({ "properties": { "Issue Type": { "select": { "name": "Broken" } } } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "row" })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/pages"))
            .and(body_partial_json(json!({ "properties": { "Issue Type": { "select": { "name": "Oversized" } } } })))
            .respond_with(ResponseTemplate::new(400).set_body_string("validation_error"))
            .mount(&server)
            .await;

        let summary = sync(&server)
            .sync_report(&report(vec![
                issue(IssueType::Broken, "Gallery"),
                issue(IssueType::Oversized, "Gallery"),
                issue(IssueType::Broken, ""),
            ]))
            .await;

        assert_eq!(summary, Some(SyncSummary { created: 2, failed: 1 }));
    }

    #[tokio::test]
    async fn test_database_failure_skips_sync() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/databases"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/pages"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let summary = sync(&server)
            .sync_report(&report(vec![issue(IssueType::Broken, "Gallery")]))
            .await;
        assert_eq!(summary, None);
    }
}

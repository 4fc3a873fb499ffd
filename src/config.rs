// src/config.rs
// =============================================================================
// Run configuration.
//
// AuditConfig carries the knobs of the crawl-and-inspect pipeline. Defaults
// match the reference behaviour (6 concurrent probes, 15s timeouts, 500 KB
// oversize threshold); the CLI can override some of them.
//
// SyncConfig is read from the environment. The Notion sync is optional: if
// either variable is missing the audit still runs and writes its reports.
// =============================================================================

use std::time::Duration;

use crate::cli::Cli;

pub const DEFAULT_CONCURRENCY: usize = 6;
pub const DEFAULT_MAX_SIZE_KB: u64 = 500;
pub const DEFAULT_MAX_SITEMAP_DEPTH: usize = 5;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

pub const NOTION_TOKEN_VAR: &str = "NOTION_TOKEN";
pub const NOTION_PARENT_VAR: &str = "NOTION_PARENT_PAGE_ID";

#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Site root, e.g. "https://example.com"
    pub base_url: String,
    /// Explicit sitemap; `None` means `<base>/sitemap.xml`
    pub sitemap_url: Option<String>,
    /// Capacity of the shared inspection gate
    pub concurrency: usize,
    /// Images strictly larger than this many bytes are oversized
    pub max_image_bytes: u64,
    pub page_timeout: Duration,
    pub probe_timeout: Duration,
    /// Nesting limit for sitemap-index expansion
    pub max_sitemap_depth: usize,
    pub user_agent: String,
}

impl AuditConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            sitemap_url: None,
            concurrency: DEFAULT_CONCURRENCY,
            max_image_bytes: DEFAULT_MAX_SIZE_KB * 1024,
            page_timeout: DEFAULT_TIMEOUT,
            probe_timeout: DEFAULT_TIMEOUT,
            max_sitemap_depth: DEFAULT_MAX_SITEMAP_DEPTH,
            user_agent: format!(
                "image-guardian/{} (+https://github.com/vswaroop04/image-guardian)",
                env!("CARGO_PKG_VERSION")
            ),
        }
    }

    pub fn from_cli(cli: &Cli) -> Self {
        let mut config = Self::new(cli.site_url.trim_end_matches('/'));
        config.sitemap_url = cli.sitemap.clone();
        // A zero-capacity gate would never admit anything
        config.concurrency = cli.concurrency.max(1);
        config.max_image_bytes = cli.max_size_kb.saturating_mul(1024);
        config
    }

    /// The sitemap to resolve: the explicit one, or `<base>/sitemap.xml`
    pub fn sitemap_url(&self) -> String {
        match &self.sitemap_url {
            Some(url) => url.clone(),
            None => format!("{}/sitemap.xml", self.base_url.trim_end_matches('/')),
        }
    }
}

/// Credentials and target for the Notion workspace sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub token: String,
    pub parent_page_id: String,
}

impl SyncConfig {
    /// Reads the sync settings, loading a `.env` file first if one exists.
    pub fn from_env() -> Option<Self> {
        // A missing .env file is the normal case
        let _ = dotenvy::dotenv();
        Self::from_values(
            std::env::var(NOTION_TOKEN_VAR).ok(),
            std::env::var(NOTION_PARENT_VAR).ok(),
        )
    }

    fn from_values(token: Option<String>, parent: Option<String>) -> Option<Self> {
        let token = token.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())?;
        let parent_page_id = parent
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())?;
        Some(Self {
            token,
            parent_page_id,
        })
    }
}

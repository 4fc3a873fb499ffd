// src/crawl/fetch.rs
// =============================================================================
// Fetches the raw markup of a single URL.
//
// One GET per call, a fixed timeout, no retry. Every failure (timeout, DNS,
// non-2xx status, undecodable body) collapses to PageFetch::Unavailable so one
// dead page can never abort the run. The reason is logged, not returned.
//
// The same fetcher serves page markup and sitemap documents.
// =============================================================================

use anyhow::{anyhow, Result};
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::AuditConfig;
use crate::error::AuditError;

/// Outcome of fetching one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageFetch {
    /// The body of a 2xx response
    Fetched(String),
    /// Anything else; the caller moves on
    Unavailable,
}

#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(config: &AuditConfig) -> Result<Self, AuditError> {
        let client = Client::builder()
            .timeout(config.page_timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }

    pub async fn fetch(&self, url: &str) -> PageFetch {
        match self.try_fetch(url).await {
            Ok(body) => {
                debug!(url, bytes = body.len(), "fetched document");
                PageFetch::Fetched(body)
            }
            Err(e) => {
                warn!(url, error = %e, "document unavailable");
                PageFetch::Unavailable
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP {}", response.status()));
        }

        Ok(response.text().await?)
    }
}

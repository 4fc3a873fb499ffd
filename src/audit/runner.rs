// src/audit/runner.rs
// =============================================================================
// Orchestrates one audit run.
//
// How it works:
// 1. Discovering: resolve the sitemap; if it lists nothing, fall back to the
//    links on the site root. Nothing at all from either is the only fatal
//    outcome of a run.
// 2. Scanning: pages one at a time, in discovery order. For each page, fetch,
//    extract image references, then check every reference concurrently
//    through the run-wide ConcurrencyLimiter. A page that cannot be fetched
//    is skipped.
// 3. Done: the collected issues and counters become an AuditReport.
// =============================================================================

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use super::issue::{classify, contains_whitespace, Issue, IssueType, PageContext};
use super::stats::{RunStatistics, StatsSnapshot};
use crate::checker::{
    extract_image_refs, normalize_image_url, page_title, ConcurrencyLimiter, ImageInspector,
    InspectionOutcome,
};
use crate::config::AuditConfig;
use crate::crawl::{discover_from_links, PageFetch, PageFetcher, SitemapResolver};
use crate::error::AuditError;

/// Everything a run produced, ready for the report writers
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub base_url: String,
    pub sitemap_url: String,
    pub generated_at: DateTime<Utc>,
    pub issues_count: usize,
    pub issues: Vec<Issue>,
    pub stats: StatsSnapshot,
}

impl AuditReport {
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunPhase {
    Discovering,
    Scanning { page_index: usize },
    Done,
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunPhase::Discovering => write!(f, "discovering"),
            RunPhase::Scanning { page_index } => write!(f, "scanning page #{}", page_index + 1),
            RunPhase::Done => write!(f, "done"),
        }
    }
}

pub struct AuditRunner {
    config: AuditConfig,
    fetcher: PageFetcher,
    inspector: ImageInspector,
    limiter: ConcurrencyLimiter,
    stats: RunStatistics,
}

impl AuditRunner {
    pub fn new(config: AuditConfig) -> Result<Self, AuditError> {
        Url::parse(&config.base_url).map_err(|source| AuditError::InvalidSiteUrl {
            url: config.base_url.clone(),
            source,
        })?;

        Ok(Self {
            fetcher: PageFetcher::new(&config)?,
            inspector: ImageInspector::new(&config)?,
            limiter: ConcurrencyLimiter::new(config.concurrency),
            stats: RunStatistics::new(),
            config,
        })
    }

    /// Handle to the run-wide gate (shares state with the runner's own)
    #[cfg(test)]
    pub fn limiter(&self) -> ConcurrencyLimiter {
        self.limiter.clone()
    }

    pub async fn run(&self) -> Result<AuditReport, AuditError> {
        let sitemap_url = self.config.sitemap_url();

        let mut phase = RunPhase::Discovering;
        debug!(%phase, sitemap = %sitemap_url, capacity = self.limiter.capacity(), "audit started");
        let pages = self.discover(&sitemap_url).await?;
        info!(pages = pages.len(), "pages to scan");

        let mut issues = Vec::new();
        for (page_index, page_url) in pages.iter().enumerate() {
            phase = RunPhase::Scanning { page_index };
            debug!(%phase, page = %page_url, in_flight = self.limiter.in_flight(), "scanning page");
            self.scan_page(page_url, &mut issues).await;
        }

        phase = RunPhase::Done;
        let stats = self.stats.snapshot();
        debug!(
            %phase,
            issues = issues.len(),
            peak_in_flight = self.limiter.peak(),
            "audit finished"
        );

        Ok(AuditReport {
            base_url: self.config.base_url.clone(),
            sitemap_url,
            generated_at: Utc::now(),
            issues_count: issues.len(),
            issues,
            stats,
        })
    }

    async fn discover(&self, sitemap_url: &str) -> Result<Vec<String>, AuditError> {
        let resolver = SitemapResolver::new(&self.fetcher, self.config.max_sitemap_depth);
        let pages = resolver.resolve(sitemap_url).await;
        if !pages.is_empty() {
            return Ok(pages);
        }

        warn!(
            sitemap = sitemap_url,
            base = %self.config.base_url,
            "sitemap listed no pages, falling back to links on the site root"
        );
        discover_from_links(&self.fetcher, &self.config.base_url)
            .await
            .ok_or_else(|| AuditError::DiscoveryFailed {
                base_url: self.config.base_url.clone(),
                sitemap_url: sitemap_url.to_string(),
            })
    }

    async fn scan_page(&self, page_url: &str, issues: &mut Vec<Issue>) {
        let html = match self.fetcher.fetch(page_url).await {
            PageFetch::Fetched(html) => html,
            PageFetch::Unavailable => {
                warn!(page = page_url, "skipping page that could not be fetched");
                self.stats.record_page_skipped();
                return;
            }
        };

        let base = match Url::parse(page_url) {
            Ok(url) => url,
            Err(e) => {
                warn!(page = page_url, error = %e, "skipping page with invalid URL");
                self.stats.record_page_skipped();
                return;
            }
        };

        let page = PageContext {
            url: page_url.to_string(),
            title: page_title(&html),
        };
        let refs = extract_image_refs(&html);
        info!(page = page_url, images = refs.len(), "checking images");

        // All checks start together; the shared limiter decides who probes
        let checks = refs.iter().map(|raw| self.check_image(&page, &base, raw));
        let found = join_all(checks).await;

        issues.extend(found.into_iter().flatten());
        self.stats.record_page_scanned();
    }

    async fn check_image(&self, page: &PageContext, base: &Url, raw: &str) -> Option<Issue> {
        let absolute = normalize_image_url(base, raw);

        // Inline data and other non-network schemes have nothing to probe
        if let Some(url) = &absolute {
            if !matches!(url.scheme(), "http" | "https") {
                debug!(page = %page.url, scheme = url.scheme(), "ignoring non-http image reference");
                return None;
            }
        }

        self.stats.record_image_checked();

        let outcome = match &absolute {
            Some(url) if !contains_whitespace(raw) => {
                self.limiter
                    .run(self.inspector.inspect(url.as_str(), &page.url))
                    .await
            }
            // Malformed references are findings in their own right
            _ => InspectionOutcome::unreachable(),
        };

        if outcome.byte_length.is_some() {
            self.stats.record_known_size();
        }

        let issue = classify(
            page,
            raw,
            absolute.as_ref().map(Url::as_str),
            &outcome,
            self.config.max_image_bytes,
        )?;

        match issue.issue_type {
            IssueType::Broken => self.stats.record_broken(),
            IssueType::Oversized => self.stats.record_oversized(),
        }
        Some(issue)
    }
}

// src/crawl/sitemap.rs
// =============================================================================
// Resolves a sitemap URL into the flat list of pages it describes.
//
// Two document shapes are understood:
//   <urlset><url><loc>PAGE</loc></url>...</urlset>
//   <sitemapindex><sitemap><loc>SITEMAP</loc></sitemap>...</sitemapindex>
//
// Index documents are expanded recursively. A failure anywhere (fetch, parse)
// empties only that branch; siblings still contribute. Sitemap indexes found
// in the wild sometimes reference themselves, so every sitemap URL is visited
// at most once and nesting stops at `max_depth`.
// =============================================================================

use std::collections::HashSet;

use anyhow::Result;
use futures::future::{BoxFuture, FutureExt};
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, info, warn};
use url::Url;

use super::fetch::{PageFetch, PageFetcher};

/// What a parsed sitemap document turned out to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// A list of pages
    UrlSet(Vec<String>),
    /// A list of further sitemaps
    Index(Vec<String>),
}

pub struct SitemapResolver<'a> {
    fetcher: &'a PageFetcher,
    max_depth: usize,
}

impl<'a> SitemapResolver<'a> {
    pub fn new(fetcher: &'a PageFetcher, max_depth: usize) -> Self {
        Self { fetcher, max_depth }
    }

    /// Returns every page listed under `sitemap_url`, deduplicated, in the
    /// order first seen.
    pub async fn resolve(&self, sitemap_url: &str) -> Vec<String> {
        let mut visited = HashSet::new();
        let pages = self.resolve_branch(sitemap_url.to_string(), 0, &mut visited).await;

        let mut seen = HashSet::new();
        let pages: Vec<String> = pages.into_iter().filter(|p| seen.insert(p.clone())).collect();

        info!(sitemap = sitemap_url, pages = pages.len(), "sitemap resolved");
        pages
    }

    // Async recursion needs a boxed future
    fn resolve_branch<'s>(
        &'s self,
        sitemap_url: String,
        depth: usize,
        visited: &'s mut HashSet<String>,
    ) -> BoxFuture<'s, Vec<String>> {
        async move {
            if depth > self.max_depth {
                warn!(sitemap = %sitemap_url, depth, "sitemap nesting too deep, skipping");
                return Vec::new();
            }
            if !visited.insert(sitemap_url.clone()) {
                debug!(sitemap = %sitemap_url, "sitemap already visited, skipping");
                return Vec::new();
            }

            let body = match self.fetcher.fetch(&sitemap_url).await {
                PageFetch::Fetched(body) => body,
                PageFetch::Unavailable => return Vec::new(),
            };

            match parse_sitemap(&sitemap_url, &body) {
                Ok(SitemapDocument::UrlSet(pages)) => pages,
                Ok(SitemapDocument::Index(children)) => {
                    debug!(sitemap = %sitemap_url, children = children.len(), "expanding sitemap index");
                    let mut pages = Vec::new();
                    for child in children {
                        pages.extend(self.resolve_branch(child, depth + 1, visited).await);
                    }
                    pages
                }
                Err(e) => {
                    warn!(sitemap = %sitemap_url, error = %e, "sitemap could not be parsed");
                    Vec::new()
                }
            }
        }
        .boxed()
    }
}

/// Parses one sitemap document. Relative `<loc>` values are resolved
/// against the sitemap's own URL.
pub fn parse_sitemap(sitemap_url: &str, xml: &str) -> Result<SitemapDocument> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut in_loc = false;
    let mut is_index = false;
    let mut saw_root = false;
    let mut locs: Vec<String> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.local_name();
                let name = name.as_ref();
                if !saw_root {
                    saw_root = true;
                    is_index = name == b"sitemapindex";
                    if !is_index && name != b"urlset" {
                        anyhow::bail!(
                            "unexpected root element <{}>",
                            String::from_utf8_lossy(name)
                        );
                    }
                } else if name == b"loc" {
                    in_loc = true;
                }
            }
            Event::End(e) => {
                if e.local_name().as_ref() == b"loc" {
                    in_loc = false;
                }
            }
            Event::Text(t) if in_loc => {
                let text = t.unescape()?;
                let text = text.trim();
                if !text.is_empty() {
                    locs.push(text.to_string());
                }
            }
            Event::CData(t) if in_loc => {
                let text = String::from_utf8_lossy(&t.into_inner()).trim().to_string();
                if !text.is_empty() {
                    locs.push(text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        anyhow::bail!("document has no root element");
    }

    let base = Url::parse(sitemap_url).ok();
    let locs = locs
        .into_iter()
        .filter_map(|loc| match Url::parse(&loc) {
            Ok(url) => Some(url.to_string()),
            Err(_) => base.as_ref()?.join(&loc).ok().map(|u| u.to_string()),
        })
        .collect();

    Ok(if is_index {
        SitemapDocument::Index(locs)
    } else {
        SitemapDocument::UrlSet(locs)
    })
}

// src/crawl/discover.rs
// =============================================================================
// Fallback page discovery for sites without a usable sitemap.
//
// One level only: fetch the site root, keep every hyperlink whose absolute
// form starts with the site's base URL, and scan those plus the root itself.
// No recursion into the discovered pages.
// =============================================================================

use std::collections::HashSet;

use scraper::{Html, Selector};
use url::Url;

use super::fetch::{PageFetch, PageFetcher};

/// Returns `None` when the site root itself cannot be fetched.
pub async fn discover_from_links(fetcher: &PageFetcher, base_url: &str) -> Option<Vec<String>> {
    let html = match fetcher.fetch(base_url).await {
        PageFetch::Fetched(html) => html,
        PageFetch::Unavailable => return None,
    };

    Some(same_site_links(&html, base_url))
}

/// The site root followed by every prefix-matching link on the page,
/// deduplicated in document order. Pages are keyed on their parsed form, so
/// `https://host` and `https://host/` count as one page.
pub fn same_site_links(html: &str, base_url: &str) -> Vec<String> {
    let base = match Url::parse(base_url) {
        Ok(url) => url,
        Err(_) => return vec![base_url.to_string()],
    };

    let mut seen = HashSet::new();
    let mut pages = Vec::new();

    seen.insert(base.to_string());
    pages.push(base.to_string());

    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").expect("static selector");

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(absolute_url) = resolve_link(&base, href) else {
            continue;
        };
        if absolute_url.starts_with(base_url) && seen.insert(absolute_url.clone()) {
            pages.push(absolute_url);
        }
    }

    pages
}

// Resolves a link (possibly relative) to an absolute URL
fn resolve_link(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();

    // Skip anchors and special protocols
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    base.join(href).ok().map(|url| url.to_string())
}

// src/crawl/mod.rs
// =============================================================================
// Page discovery and retrieval.
//
// Submodules:
// - fetch: single-attempt, fail-soft document fetching
// - sitemap: sitemap / sitemap-index resolution
// - discover: one-level link discovery when there is no sitemap
// =============================================================================

mod discover;
mod fetch;
mod sitemap;

pub use discover::discover_from_links;
pub use fetch::{PageFetch, PageFetcher};
pub use sitemap::SitemapResolver;

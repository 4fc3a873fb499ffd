// src/error.rs
// =============================================================================
// Errors that abort an audit run.
//
// Almost everything in the pipeline fails soft: an unreachable page is
// skipped, a broken image becomes an Issue. The variants below are the few
// conditions where there is nothing sensible left to do.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    /// The site URL given on the command line could not be parsed
    #[error("invalid site URL '{url}': {source}")]
    InvalidSiteUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The sitemap listed no pages and the site root could not be fetched either
    #[error("no pages discovered: sitemap {sitemap_url} is empty and {base_url} is unreachable")]
    DiscoveryFailed { base_url: String, sitemap_url: String },

    /// The HTTP client could not be constructed (TLS backend, bad header value)
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

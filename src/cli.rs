// src/cli.rs
// =============================================================================
// Command-line interface, defined with clap's derive API.
//
// image-guardian takes one positional argument (the site to audit) and a
// handful of optional flags. Everything else is configured with defaults in
// src/config.rs or, for the Notion sync, through environment variables.
// =============================================================================

use std::path::PathBuf;

use clap::Parser;

use crate::config::{DEFAULT_CONCURRENCY, DEFAULT_MAX_SIZE_KB};

#[derive(Parser, Debug)]
#[command(
    name = "image-guardian",
    version,
    about = "Audit a website for broken and oversized images",
    long_about = "image-guardian reads a site's sitemap (or its home page links), fetches every page, \
                  and checks every referenced image for reachability and payload size. \
                  Findings are written as CSV and JSON and can optionally be synced to Notion \
                  (set NOTION_TOKEN and NOTION_PARENT_PAGE_ID)."
)]
pub struct Cli {
    /// Website URL to audit (e.g., https://example.com)
    pub site_url: String,

    /// Sitemap URL (default: <SITE_URL>/sitemap.xml)
    #[arg(long)]
    pub sitemap: Option<String>,

    /// Directory where image-audit.csv and image-audit.json are written
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Maximum number of image probes in flight at once, across all pages
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Images larger than this many kilobytes are reported as oversized
    #[arg(long, default_value_t = DEFAULT_MAX_SIZE_KB)]
    pub max_size_kb: u64,

    /// Skip the Notion sync even if credentials are configured
    #[arg(long)]
    pub no_sync: bool,

    /// Print the JSON report to stdout instead of the summary table
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging for image-guardian
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["image-guardian", "https://example.com"]);
        assert_eq!(cli.site_url, "https://example.com");
        assert_eq!(cli.sitemap, None);
        assert_eq!(cli.concurrency, 6);
        assert_eq!(cli.max_size_kb, 500);
        assert!(!cli.no_sync);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "image-guardian",
            "https://example.com",
            "--sitemap",
            "https://example.com/index.xml",
            "--concurrency",
            "2",
            "--json",
            "--no-sync",
        ]);
        assert_eq!(cli.sitemap.as_deref(), Some("https://example.com/index.xml"));
        assert_eq!(cli.concurrency, 2);
        assert!(cli.json);
        assert!(cli.no_sync);
    }
}

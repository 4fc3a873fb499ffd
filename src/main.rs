// src/main.rs
// =============================================================================
// Entry point of the image-guardian CLI.
//
// What happens here:
// 1. Parse command-line arguments and install the log subscriber
// 2. Run the audit (discover pages, check every image)
// 3. Write the CSV and JSON reports, print a summary
// 4. Optionally sync the findings to Notion
// 5. Exit with a meaningful code (0 = clean, 1 = issues found, 2 = error)
// =============================================================================

mod audit;
mod checker;
mod cli;
mod config;
mod crawl;
mod error;
mod notion;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use audit::{AuditReport, AuditRunner};
use cli::Cli;
use config::{AuditConfig, SyncConfig};
use notion::NotionSync;

// Probes are I/O bound; one thread with cooperative tasks is enough
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // Unexpected failure: print the whole error chain and exit with code 2
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "info,image_guardian=debug"
    } else {
        "info,image_guardian=info"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// Returns:
//   Ok(0) = no issues
//   Ok(1) = broken or oversized images found
//   Err   = the audit could not run (exit code 2)
async fn run(cli: Cli) -> Result<i32> {
    let config = AuditConfig::from_cli(&cli);

    println!("🔍 Auditing images on: {}", config.base_url);
    println!("🗺️  Sitemap: {}", config.sitemap_url());

    let runner = AuditRunner::new(config)?;
    let report = runner.run().await?;

    write_reports(&cli, &report)?;

    if cli.json {
        println!("{}", report::render_json(&report)?);
    } else {
        report::print_summary(&report);
    }

    if cli.no_sync {
        info!("Notion sync disabled by --no-sync");
    } else {
        sync_to_notion(&report).await;
    }

    Ok(if report.has_issues() { 1 } else { 0 })
}

fn write_reports(cli: &Cli, report: &AuditReport) -> Result<()> {
    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("creating output directory {}", cli.out_dir.display()))?;

    let csv_path = cli.out_dir.join(report::CSV_FILE_NAME);
    report::write_csv_report(&csv_path, &report.issues)?;

    let json_path = cli.out_dir.join(report::JSON_FILE_NAME);
    report::write_json_report(&json_path, report)?;

    info!(csv = %csv_path.display(), json = %json_path.display(), "reports written");
    Ok(())
}

// Never fails the run: every problem is logged and the sync is abandoned
async fn sync_to_notion(report: &AuditReport) {
    let Some(config) = SyncConfig::from_env() else {
        info!("Notion sync not configured, skipping");
        return;
    };

    let sync = match NotionSync::new(&config) {
        Ok(sync) => sync,
        Err(e) => {
            warn!(error = %e, "Notion sync unavailable");
            return;
        }
    };

    if let Some(summary) = sync.sync_report(report).await {
        println!(
            "📝 Notion: {} row(s) created, {} failed",
            summary.created, summary.failed
        );
    }
}

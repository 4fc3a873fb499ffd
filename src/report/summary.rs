// src/report/summary.rs
// =============================================================================
// Human-readable summary printed to the terminal after a run.
// =============================================================================

use crate::audit::{AuditReport, Issue, IssueType, StatsSnapshot};

pub fn print_summary(report: &AuditReport) {
    if report.has_issues() {
        print_table(&report.issues);
    } else {
        println!("✅ No broken or oversized images found");
        println!();
    }

    print_counters(&report.stats);
}

fn print_counters(stats: &StatsSnapshot) {
    println!("📊 Summary:");
    println!("   📄 Pages scanned: {}", stats.pages_scanned);
    if stats.pages_skipped > 0 {
        println!("   ⚠️  Pages skipped: {}", stats.pages_skipped);
    }
    println!("   🖼️  Images checked: {}", stats.total_images_checked);
    println!("   📏 With known size: {}", stats.images_with_known_size);
    println!("   ✅ OK: {}", stats.images_ok());
    println!("   ❌ Broken: {}", stats.broken_images_found);
    println!("   🐘 Oversized: {}", stats.oversized_images_found);
}

fn print_table(issues: &[Issue]) {
    println!("{:<50} {:<50} {:<15}", "PAGE", "IMAGE", "ISSUE");
    println!("{}", "=".repeat(115));

    for issue in issues {
        println!(
            "{:<50} {:<50} {:<15}",
            truncate(&issue.page, 47),
            truncate(issue.image_url(), 47),
            format_issue(issue)
        );
    }

    println!();
}

fn format_issue(issue: &Issue) -> String {
    match (issue.issue_type, issue.image_size_kb) {
        (IssueType::Broken, _) => "❌ BROKEN".to_string(),
        (IssueType::Oversized, Some(kb)) => format!("🐘 {} KB", kb),
        (IssueType::Oversized, None) => "🐘 OVERSIZED".to_string(),
    }
}

// Truncates on a char boundary, appending "..." when shortened
fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() > max_chars {
        let head: String = value.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        value.to_string()
    }
}

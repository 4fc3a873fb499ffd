// src/audit/mod.rs
// =============================================================================
// The audit pipeline: issue model, classification, counters, orchestration.
// =============================================================================

mod issue;
mod runner;
mod stats;

pub use issue::{Issue, IssueType};
pub use runner::{AuditReport, AuditRunner};
pub use stats::StatsSnapshot;

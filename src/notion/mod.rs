// src/notion/mod.rs
// =============================================================================
// Optional sync of audit findings into a Notion workspace.
//
// Enabled only when NOTION_TOKEN and NOTION_PARENT_PAGE_ID are both set
// (see src/config.rs). The audit and its reports never depend on it.
// =============================================================================

mod client;

pub use client::NotionSync;

// src/audit/issue.rs
// =============================================================================
// Issue records and the rules that produce them.
//
// An image is Broken when its raw reference contains whitespace or the probe
// says it is unreachable. It is Oversized when it is reachable and declares a
// size strictly above the threshold. Broken wins: a size reported by a failed
// probe is not trustworthy.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::checker::InspectionOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueType {
    Broken,
    Oversized,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Broken => "Broken",
            IssueType::Oversized => "Oversized",
        }
    }
}

/// One finding. Exactly one of the two URL fields is set, matching `issue_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub page: String,
    pub page_title: String,
    pub issue_type: IssueType,
    pub broken_image_url: Option<String>,
    pub oversized_image_url: Option<String>,
    #[serde(rename = "imageSizeKB")]
    pub image_size_kb: Option<u64>,
}

impl Issue {
    /// The image URL this issue is about, whichever field holds it
    pub fn image_url(&self) -> &str {
        self.broken_image_url
            .as_deref()
            .or(self.oversized_image_url.as_deref())
            .unwrap_or_default()
    }
}

/// The page an image reference was found on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    pub url: String,
    pub title: String,
}

pub fn contains_whitespace(raw: &str) -> bool {
    raw.chars().any(char::is_whitespace)
}

/// Turns one inspection into zero or one issue.
///
/// `absolute_url` is the normalized form of `raw`; it is reported for
/// oversized images, while broken ones keep the raw value for diagnosis.
pub fn classify(
    page: &PageContext,
    raw: &str,
    absolute_url: Option<&str>,
    outcome: &InspectionOutcome,
    max_bytes: u64,
) -> Option<Issue> {
    let is_broken = contains_whitespace(raw) || !outcome.reachable;

    if is_broken {
        return Some(Issue {
            page: page.url.clone(),
            page_title: page.title.clone(),
            issue_type: IssueType::Broken,
            broken_image_url: Some(raw.to_string()),
            oversized_image_url: None,
            image_size_kb: None,
        });
    }

    match (outcome.byte_length, absolute_url) {
        (Some(bytes), Some(url)) if bytes > max_bytes => Some(Issue {
            page: page.url.clone(),
            page_title: page.title.clone(),
            issue_type: IssueType::Oversized,
            broken_image_url: None,
            oversized_image_url: Some(url.to_string()),
            image_size_kb: Some(size_kb(bytes)),
        }),
        _ => None,
    }
}

// Rounded to the nearest kilobyte
fn size_kb(bytes: u64) -> u64 {
    (bytes + 512) / 1024
}

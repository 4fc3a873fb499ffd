// src/checker/mod.rs
// =============================================================================
// Image reference extraction and inspection.
//
// Submodules:
// - html: pulls image references out of markup and inline styles
// - http: probes one image URL with a HEAD request
// - limiter: the shared gate bounding probes in flight
// =============================================================================

mod html;
mod http;
mod limiter;

pub use html::{extract_image_refs, normalize_image_url, page_title};
pub use http::{ImageInspector, InspectionOutcome};
pub use limiter::ConcurrencyLimiter;

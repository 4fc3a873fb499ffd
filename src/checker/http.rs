// src/checker/http.rs
// =============================================================================
// Probes image URLs for reachability and declared size.
//
// Key functionality:
// - Sends a HEAD request (headers only, the image body is never downloaded)
// - Treats any status code as data: 2xx means reachable, anything else not
// - Reads the declared Content-Length as the image size, when present
// - Collapses transport failures (timeout, DNS, reset) into "unreachable"
//
// There is no retry and no GET fallback: one attempt per image per page.
// =============================================================================

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_LENGTH, REFERER};
use reqwest::Client;
use tracing::debug;

use crate::config::AuditConfig;
use crate::error::AuditError;

const IMAGE_ACCEPT: &str = "image/avif,image/webp,image/apng,image/svg+xml,image/*,*/*;q=0.8";

/// What a single probe learned about an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InspectionOutcome {
    pub reachable: bool,
    pub status_code: Option<u16>,
    /// Declared size; `None` when the header is missing or the probe failed
    pub byte_length: Option<u64>,
}

impl InspectionOutcome {
    /// Outcome for a reference that was never probed
    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            status_code: None,
            byte_length: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageInspector {
    client: Client,
}

impl ImageInspector {
    pub fn new(config: &AuditConfig) -> Result<Self, AuditError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(IMAGE_ACCEPT));

        let client = Client::builder()
            .timeout(config.probe_timeout)
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()?;
        Ok(Self { client })
    }

    pub async fn inspect(&self, url: &str, referer: &str) -> InspectionOutcome {
        let mut request = self.client.head(url);
        if let Ok(value) = HeaderValue::from_str(referer) {
            request = request.header(REFERER, value);
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                let outcome = InspectionOutcome {
                    reachable: status.is_success(),
                    status_code: Some(status.as_u16()),
                    byte_length: declared_length(response.headers()),
                };
                debug!(url, status = status.as_u16(), bytes = ?outcome.byte_length, "probed image");
                outcome
            }
            Err(e) => {
                debug!(url, error = %e, "image probe failed");
                InspectionOutcome {
                    reachable: false,
                    status_code: e.status().map(|s| s.as_u16()),
                    byte_length: None,
                }
            }
        }
    }
}

// Response::content_length() reports the body size, which is zero for HEAD,
// so the header is read directly.
fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn inspector() -> ImageInspector {
        ImageInspector::new(&AuditConfig::new("http://localhost")).unwrap()
    }

    #[test]
    fn test_declared_length() {
        let mut headers = HeaderMap::new();
        assert_eq!(declared_length(&headers), None);

        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("600000"));
        assert_eq!(declared_length(&headers), Some(600_000));

        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("lots"));
        assert_eq!(declared_length(&headers), None);
    }

    #[tokio::test]
    async fn test_reachable_image_sends_referer() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/logo.png"))
            .and(header("referer", "https://example.com/page"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = inspector()
            .inspect(&format!("{}/logo.png", server.uri()), "https://example.com/page")
            .await;

        assert!(outcome.reachable);
        assert_eq!(outcome.status_code, Some(200));
    }

    #[tokio::test]
    async fn test_not_found_is_data_not_error() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let outcome = inspector()
            .inspect(&format!("{}/gone.png", server.uri()), "https://example.com/")
            .await;

        assert!(!outcome.reachable);
        assert_eq!(outcome.status_code, Some(404));
    }

    #[tokio::test]
    async fn test_transport_failure_is_unreachable() {
        let outcome = inspector()
            .inspect("http://127.0.0.1:9/nothing.png", "https://example.com/")
            .await;
        assert!(!outcome.reachable);
        assert_eq!(outcome.byte_length, None);
    }
}

// src/checker/html.rs
// =============================================================================
// Extracts image references from HTML pages.
//
// Sources scanned, all feeding the same set:
// - <img src> and <img srcset>
// - <source src> and <source srcset> inside <picture>
// - url(...) tokens in any inline style attribute
// - Open Graph / Twitter card image meta tags
//
// Values are kept exactly as written in the markup. A reference with a stray
// space in it is itself a finding, so nothing is trimmed or resolved here;
// that is normalize_image_url's job, later.
// =============================================================================

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

const IMG_SELECTOR: &str = "img";
const PICTURE_SOURCE_SELECTOR: &str = "picture source";
const STYLE_SELECTOR: &str = "[style]";
const META_IMAGE_SELECTOR: &str = r#"meta[property="og:image"], meta[property="og:image:url"], meta[property="og:image:secure_url"], meta[name="twitter:image"], meta[name="twitter:image:src"]"#;

fn css_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"url\(\s*([^)]*?)\s*\)").expect("static regex"))
}

/// Collects the distinct raw image references on one page.
///
/// The result is a set: the same value referenced twice on a page is
/// checked once. Ordering is lexical, which keeps reports stable.
pub fn extract_image_refs(html: &str) -> BTreeSet<String> {
    let document = Html::parse_document(html);
    let mut refs = BTreeSet::new();

    // Our selectors are constants and known to be valid
    let img = Selector::parse(IMG_SELECTOR).expect("static selector");
    let source = Selector::parse(PICTURE_SOURCE_SELECTOR).expect("static selector");
    let styled = Selector::parse(STYLE_SELECTOR).expect("static selector");
    let meta = Selector::parse(META_IMAGE_SELECTOR).expect("static selector");

    for element in document.select(&img).chain(document.select(&source)) {
        if let Some(src) = element.value().attr("src") {
            insert_raw(&mut refs, src);
        }
        if let Some(srcset) = element.value().attr("srcset") {
            for candidate in srcset_urls(srcset) {
                insert_raw(&mut refs, candidate);
            }
        }
    }

    for element in document.select(&styled) {
        if let Some(style) = element.value().attr("style") {
            for candidate in css_urls(style) {
                insert_raw(&mut refs, candidate);
            }
        }
    }

    for element in document.select(&meta) {
        if let Some(content) = element.value().attr("content") {
            insert_raw(&mut refs, content);
        }
    }

    refs
}

/// Text of the page's first `<title>`, or an empty string.
pub fn page_title(html: &str) -> String {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").expect("static selector");
    document
        .select(&selector)
        .next()
        .map(|title| title.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Resolves a raw reference against the page it was found on.
///
/// Surrounding whitespace and one pair of matching quotes are stripped
/// first. Returns `None` when no valid URL comes out of it.
pub fn normalize_image_url(base: &Url, raw: &str) -> Option<Url> {
    let cleaned = strip_quotes(raw.trim()).trim();
    if cleaned.is_empty() {
        return None;
    }
    base.join(cleaned).ok()
}

// "a.jpg 1x, b.jpg 2x" -> ["a.jpg", "b.jpg"]
//
// A candidate URL runs up to the next whitespace, the way browsers read it,
// so commas inside `data:` URLs do not split the candidate.
fn srcset_urls(srcset: &str) -> Vec<&str> {
    let mut urls = Vec::new();
    let mut rest = srcset;

    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
        if rest.is_empty() {
            break;
        }

        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let (candidate, tail) = rest.split_at(end);

        // "a.jpg,b.jpg 2x": a trailing comma ends a candidate without descriptors
        if candidate.ends_with(',') {
            urls.push(candidate.trim_end_matches(','));
            rest = tail;
            continue;
        }

        urls.push(candidate);
        match tail.find(',') {
            Some(comma) => rest = &tail[comma + 1..],
            None => break,
        }
    }

    urls
}

fn css_urls(style: &str) -> Vec<&str> {
    css_url_pattern()
        .captures_iter(style)
        .filter_map(|caps| caps.get(1))
        .map(|m| strip_quotes(m.as_str()))
        .collect()
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn insert_raw(refs: &mut BTreeSet<String>, value: &str) {
    if !value.trim().is_empty() {
        refs.insert(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_img_src_and_srcset() {
        let html = r#"<img src="hero.png" srcset="a.jpg 1x, b.jpg 2x">"#;
        assert_eq!(extract_image_refs(html), set(&["hero.png", "a.jpg", "b.jpg"]));
    }

    #[test]
    fn test_srcset_width_descriptors() {
        let html = r#"<img srcset="/img/small.jpg 480w,
                                 /img/large.jpg   1080w">"#;
        assert_eq!(
            extract_image_refs(html),
            set(&["/img/small.jpg", "/img/large.jpg"])
        );
    }

    #[test]
    fn test_srcset_data_candidate_stays_whole() {
        let html = r#"<img srcset="data:image/png;base64,iVBORw0KGgo= 1x, /hi.png 2x">"#;
        assert_eq!(
            extract_image_refs(html),
            set(&["data:image/png;base64,iVBORw0KGgo=", "/hi.png"])
        );
    }

    #[test]
    fn test_picture_sources() {
        let html = r#"
            <picture>
              <source srcset="photo.avif" type="image/avif">
              <source src="photo.webp">
              <img src="photo.jpg">
            </picture>
        "#;
        assert_eq!(
            extract_image_refs(html),
            set(&["photo.avif", "photo.webp", "photo.jpg"])
        );
    }

    #[test]
    fn test_inline_style_urls() {
        let html = r#"
            <div style="background-image: url('/bg.png')"></div>
            <section style='background: url("hero.jpg") no-repeat, url(pattern.svg)'></section>
        "#;
        assert_eq!(
            extract_image_refs(html),
            set(&["/bg.png", "hero.jpg", "pattern.svg"])
        );
    }

    #[test]
    fn test_social_meta_tags() {
        let html = r#"
            <head>
              <meta property="og:image" content="https://cdn.example.com/og.png">
              <meta name="twitter:image" content="/twitter.png">
              <meta name="description" content="not an image">
            </head>
        "#;
        assert_eq!(
            extract_image_refs(html),
            set(&["https://cdn.example.com/og.png", "/twitter.png"])
        );
    }

    #[test]
    fn test_duplicates_collapse() {
        let html = r#"<img src="logo.png"><img src="logo.png"><div style="background:url(logo.png)"></div>"#;
        assert_eq!(extract_image_refs(html), set(&["logo.png"]));
    }

    #[test]
    fn test_whitespace_is_preserved() {
        let html = r#"<img src="my photo.png"><img src="">"#;
        assert_eq!(extract_image_refs(html), set(&["my photo.png"]));
    }

    #[test]
    fn test_page_title() {
        assert_eq!(page_title("<title>  Home | Example </title>"), "Home | Example");
        assert_eq!(page_title("<p>no title</p>"), "");
    }

    #[test]
    fn test_normalize_relative() {
        let base = Url::parse("https://example.com/blog/post").unwrap();
        let url = normalize_image_url(&base, "../img/a.png").unwrap();
        assert_eq!(url.as_str(), "https://example.com/img/a.png");
    }

    #[test]
    fn test_normalize_strips_whitespace_and_quotes() {
        let base = Url::parse("https://example.com/").unwrap();
        let url = normalize_image_url(&base, "  'logo.png' ").unwrap();
        assert_eq!(url.as_str(), "https://example.com/logo.png");
    }

    #[test]
    fn test_normalize_absolute_and_invalid() {
        let base = Url::parse("https://example.com/").unwrap();
        let url = normalize_image_url(&base, "https://cdn.example.com/a.png").unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.com/a.png");

        assert_eq!(normalize_image_url(&base, "http://[::1"), None);
        assert_eq!(normalize_image_url(&base, "\"\""), None);
    }
}

//! Bundled HTML link extractor
//!
//! Scans markup with scraper selectors: `<a>`, `<area>` and `<link>` hrefs
//! become markup candidates, `<script src>` becomes a script candidate, and
//! a `<meta name="robots">` directive containing `nofollow` raises the
//! no-follow flag.

use async_trait::async_trait;
use scraper::{Html, Selector};
use url::Url;

use super::{ExtractedLinks, LinkCandidate, LinkExtractor};

/// Default [`LinkExtractor`] backed by the scraper crate
///
/// Only text and XHTML/XML content types are scanned; everything else
/// yields no candidates. Candidates are resolved against the document URL
/// and deduplicated within the document.
#[derive(Debug, Default)]
pub struct HtmlLinkExtractor;

impl HtmlLinkExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LinkExtractor for HtmlLinkExtractor {
    async fn extract(
        &self,
        body: &[u8],
        content_type: Option<&str>,
        base: &Url,
    ) -> ExtractedLinks {
        extract_from_html(body, content_type, base)
    }
}

/// Whether a content type is worth scanning for links
///
/// Mirrors the usual crawler set: any `text/*` plus XHTML and XML. A
/// missing content type is not scanned.
fn is_markup(content_type: Option<&str>) -> bool {
    let Some(value) = content_type else {
        return false;
    };
    let mime = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime.starts_with("text/") || mime == "application/xhtml+xml" || mime == "application/xml"
}

/// Synchronous worker behind [`HtmlLinkExtractor`]
///
/// Kept out of the async fn so the non-Send scraper document never touches
/// the future.
fn extract_from_html(body: &[u8], content_type: Option<&str>, base: &Url) -> ExtractedLinks {
    if !is_markup(content_type) {
        return ExtractedLinks::default();
    }

    let text = String::from_utf8_lossy(body);
    let document = Html::parse_document(&text);

    let mut extracted = ExtractedLinks {
        candidates: Vec::new(),
        nofollow: has_nofollow_directive(&document),
    };
    let mut seen: Vec<String> = Vec::new();

    let mut push = |url: Url, from_script: bool, extracted: &mut ExtractedLinks| {
        if seen.iter().any(|s| s == url.as_str()) {
            return;
        }
        seen.push(url.to_string());
        extracted.candidates.push(LinkCandidate { url, from_script });
    };

    // Markup links
    for selector in ["a[href]", "area[href]", "link[href]"] {
        if let Ok(sel) = Selector::parse(selector) {
            for element in document.select(&sel) {
                if let Some(href) = element.value().attr("href") {
                    if let Some(url) = resolve_link(href, base) {
                        push(url, false, &mut extracted);
                    }
                }
            }
        }
    }

    // Script sources, tagged so `parse-script-tags = false` can drop them
    if let Ok(sel) = Selector::parse("script[src]") {
        for element in document.select(&sel) {
            if let Some(src) = element.value().attr("src") {
                if let Some(url) = resolve_link(src, base) {
                    push(url, true, &mut extracted);
                }
            }
        }
    }

    extracted
}

/// Checks for `<meta name="robots" content="...nofollow...">`
fn has_nofollow_directive(document: &Html) -> bool {
    let Ok(sel) = Selector::parse("meta[name][content]") else {
        return false;
    };

    document.select(&sel).any(|element| {
        let value = element.value();
        let is_robots = value
            .attr("name")
            .map(|name| name.eq_ignore_ascii_case("robots"))
            .unwrap_or(false);
        is_robots
            && value
                .attr("content")
                .map(|content| content.to_ascii_lowercase().contains("nofollow"))
                .unwrap_or(false)
    })
}

/// Resolves an href to an absolute URL and validates it
///
/// Returns None for links a crawler never follows:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only anchors
/// - anything that is not http(s) after resolution
fn resolve_link(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    if href.starts_with('#') {
        return None;
    }

    match base.join(href) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Some(url),
        _ => None,
    }
}

//! Link discovery capability
//!
//! The engine treats link extraction as a pluggable capability: given a
//! fetched body and its content type, produce candidate URLs and a no-follow
//! flag. [`HtmlLinkExtractor`] is the bundled implementation; embedders can
//! swap in their own (a JSON API walker, a PDF outliner) by implementing
//! [`LinkExtractor`].

mod html;

pub use html::HtmlLinkExtractor;

use async_trait::async_trait;
use url::Url;

/// One discovered link, tagged with where in the document it came from
///
/// The `from_script` tag lets the crawler honor `parse-script-tags = false`
/// without the extractor knowing about configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCandidate {
    /// Absolute URL, already resolved against the document's base
    pub url: Url,

    /// True when the link came from a `<script src>`-like attribute
    pub from_script: bool,
}

impl LinkCandidate {
    pub fn markup(url: Url) -> Self {
        Self {
            url,
            from_script: false,
        }
    }

    pub fn script(url: Url) -> Self {
        Self {
            url,
            from_script: true,
        }
    }
}

/// Everything an extractor found in one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedLinks {
    /// Candidates in document order, deduplicated within the document
    pub candidates: Vec<LinkCandidate>,

    /// True when the document declared a no-follow meta directive; the
    /// crawler drops every candidate when this is set
    pub nofollow: bool,
}

/// Capability seam for turning a fetched body into candidate links
///
/// Implementations decide for themselves which content types they can
/// handle and return an empty [`ExtractedLinks`] for the rest.
#[async_trait]
pub trait LinkExtractor: Send + Sync {
    async fn extract(&self, body: &[u8], content_type: Option<&str>, base: &Url)
        -> ExtractedLinks;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_constructors() {
        let url = Url::parse("http://example.com/a").unwrap();
        assert!(!LinkCandidate::markup(url.clone()).from_script);
        assert!(LinkCandidate::script(url).from_script);
    }

    #[test]
    fn test_extracted_links_default_is_empty() {
        let extracted = ExtractedLinks::default();
        assert!(extracted.candidates.is_empty());
        assert!(!extracted.nofollow);
    }
}

//! Queue item definitions for tracking per-URL crawl progress
//!
//! Each URL under consideration is one [`QueueItem`] moving through a closed
//! status graph; items are never removed from the queue, only transitioned.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::url::fingerprint;
use crate::CrawlError;

/// Represents the current status of a queue item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    // ===== Active states =====
    /// Item is waiting for the scheduler to pick it up
    Queued,

    /// Item has been picked for dispatch; robots policy is being resolved
    Spooled,

    /// Request has been handed to the transport
    Downloading,

    // ===== Terminal states =====
    /// Body received and processed
    Downloaded,

    /// A redirect response ended this item; the chain continues in the
    /// target's own item, if policy admitted one
    Redirected,

    /// The server said 404/410, or robots.txt forbade the fetch
    NotFound,

    /// Transport failure, non-success status, size ceiling, or robots error
    Failed,
}

impl ItemStatus {
    /// Returns true if this status admits no further transitions
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Queued | Self::Spooled | Self::Downloading)
    }

    /// Returns true if the item may still make progress
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Whether a transition from `self` to `next` is legal
    ///
    /// The graph is strictly forward: `Queued -> Spooled -> Downloading ->
    /// {Downloaded, Redirected, NotFound, Failed}`, with `Spooled` allowed
    /// to fail early (robots denial or robots error happens before any
    /// request is issued). Terminal states have no exits, and no status
    /// transitions to itself.
    pub fn can_transition_to(&self, next: ItemStatus) -> bool {
        match self {
            Self::Queued => matches!(next, Self::Spooled),
            Self::Spooled => matches!(next, Self::Downloading | Self::NotFound | Self::Failed),
            Self::Downloading => matches!(
                next,
                Self::Downloaded | Self::Redirected | Self::NotFound | Self::Failed
            ),
            _ => false,
        }
    }

    /// Returns all statuses, in lifecycle order
    pub fn all() -> Vec<Self> {
        vec![
            Self::Queued,
            Self::Spooled,
            Self::Downloading,
            Self::Downloaded,
            Self::Redirected,
            Self::NotFound,
            Self::Failed,
        ]
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Queued => "queued",
            Self::Spooled => "spooled",
            Self::Downloading => "downloading",
            Self::Downloaded => "downloaded",
            Self::Redirected => "redirected",
            Self::NotFound => "notfound",
            Self::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// Response metadata accumulated as a fetch progresses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateData {
    /// HTTP status code of the last response for this item
    pub code: Option<u16>,

    /// Content-Type of the response
    pub content_type: Option<String>,

    /// Declared Content-Length, when the server sent one
    pub content_length: Option<u64>,

    /// Bytes actually received
    pub received_length: Option<u64>,

    /// Where a redirect response pointed, absolute
    pub final_url: Option<String>,
}

/// One URL under consideration by the crawl
///
/// Created when a URL is proposed (seed, discovered link, sitemap entry, or
/// redirect target) and survives dedup and policy checks. Mutated only by
/// the scheduler as the fetch progresses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueItem {
    /// Absolute URL of the resource
    pub url: Url,

    /// Lowercase host
    pub host: String,

    /// Path component, query excluded
    pub path: String,

    /// URL scheme (`http` or `https`)
    pub protocol: String,

    /// Link depth from the seed; the seed itself is 0
    pub depth: u32,

    /// URL of the page this item was discovered on, absent for the seed
    /// and for sitemap entries
    pub referrer: Option<Url>,

    /// True once a terminal status has been reached
    pub fetched: bool,

    /// Current lifecycle status
    pub status: ItemStatus,

    /// Response metadata, filled in as the fetch progresses
    pub state_data: StateData,
}

impl QueueItem {
    /// Creates a fresh item in the `Queued` status
    pub fn new(url: Url, referrer: Option<Url>, depth: u32) -> Self {
        let host = url.host_str().unwrap_or_default().to_lowercase();
        let path = url.path().to_string();
        let protocol = url.scheme().to_string();

        Self {
            url,
            host,
            path,
            protocol,
            depth,
            referrer,
            fetched: false,
            status: ItemStatus::Queued,
            state_data: StateData::default(),
        }
    }

    /// The dedup fingerprint of this item's URL
    pub fn fingerprint(&self) -> String {
        fingerprint(&self.url)
    }

    /// Applies a status transition, validating it against the closed graph
    ///
    /// Entering a terminal status also sets `fetched`.
    pub fn transition(&mut self, next: ItemStatus) -> Result<(), CrawlError> {
        if !self.status.can_transition_to(next) {
            return Err(CrawlError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }

        self.status = next;
        if next.is_terminal() {
            self.fetched = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(url: &str) -> QueueItem {
        QueueItem::new(Url::parse(url).unwrap(), None, 0)
    }

    #[test]
    fn test_new_item_fields() {
        let item = item("http://Example.COM:3000/a/b?q=1");
        assert_eq!(item.host, "example.com");
        assert_eq!(item.path, "/a/b");
        assert_eq!(item.protocol, "http");
        assert_eq!(item.depth, 0);
        assert_eq!(item.status, ItemStatus::Queued);
        assert!(!item.fetched);
        assert!(item.referrer.is_none());
    }

    #[test]
    fn test_full_download_lifecycle() {
        let mut item = item("http://example.com/");
        item.transition(ItemStatus::Spooled).unwrap();
        item.transition(ItemStatus::Downloading).unwrap();
        item.transition(ItemStatus::Downloaded).unwrap();
        assert!(item.fetched);
        assert!(item.status.is_terminal());
    }

    #[test]
    fn test_spooled_may_fail_before_any_request() {
        let mut item = item("http://example.com/");
        item.transition(ItemStatus::Spooled).unwrap();
        item.transition(ItemStatus::NotFound).unwrap();
        assert!(item.fetched);
    }

    #[test]
    fn test_illegal_transitions_are_rejected() {
        let mut item = item("http://example.com/");
        let err = item.transition(ItemStatus::Downloaded).unwrap_err();
        assert!(matches!(
            err,
            CrawlError::InvalidTransition {
                from: ItemStatus::Queued,
                to: ItemStatus::Downloaded
            }
        ));
        // The failed transition must not have moved the item
        assert_eq!(item.status, ItemStatus::Queued);
        assert!(!item.fetched);
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for terminal in [
            ItemStatus::Downloaded,
            ItemStatus::Redirected,
            ItemStatus::NotFound,
            ItemStatus::Failed,
        ] {
            for next in ItemStatus::all() {
                assert!(
                    !terminal.can_transition_to(next),
                    "{} -> {} should be rejected",
                    terminal,
                    next
                );
            }
        }
    }

    #[test]
    fn test_no_self_transitions() {
        for status in ItemStatus::all() {
            assert!(!status.can_transition_to(status));
        }
    }

    #[test]
    fn test_fingerprint_strips_fragment() {
        let a = item("http://example.com/page#top");
        let b = item("http://example.com/page");
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_status_serde_names() {
        let json = serde_json::to_string(&ItemStatus::NotFound).unwrap();
        assert_eq!(json, r#""notfound""#);
        let back: ItemStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ItemStatus::NotFound);
    }
}

//! Request construction and response classification
//!
//! Pure helpers between the queue and the transport: build the outgoing
//! request descriptor for an item and classify what came back. Everything
//! here is I/O-free and unit-tested directly.

use std::time::Duration;

use crate::config::CrawlConfig;
use crate::cookies::CookieJar;
use crate::queue::QueueItem;
use crate::transport::{RequestDescriptor, ResponseMeta};

/// What a non-redirect response means for the item's lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResponseClass {
    /// 2xx: content downloaded
    Success,
    /// 404 or 410: the resource is gone, not an infrastructure failure
    NotFound,
    /// Everything else
    Failure,
}

pub(crate) fn classify_status(code: u16) -> ResponseClass {
    match code {
        200..=299 => ResponseClass::Success,
        404 | 410 => ResponseClass::NotFound,
        _ => ResponseClass::Failure,
    }
}

/// Builds the outgoing request for a queue item
///
/// Carries the configured user agent, the cookie header for the item's host
/// (when the jar has one), the body-size ceiling, and the request timeout.
/// Listeners may still mutate the result before transmission.
pub(crate) fn build_request(
    item: &QueueItem,
    config: &CrawlConfig,
    jar: &CookieJar,
) -> RequestDescriptor {
    let mut request = RequestDescriptor::get(item.url.clone());
    request.set_header("User-Agent", &config.user_agent);
    if let Some(cookie_header) = jar.header_for(&item.host) {
        request.set_header("Cookie", &cookie_header);
    }
    request.body_limit = Some(config.max_resource_size);
    request.timeout = Duration::from_secs(config.request_timeout_secs);
    request
}

/// Re-checks the size ceiling on a returned body
///
/// The bundled transport enforces the ceiling while streaming; this guards
/// the same invariant against transports that do not.
pub(crate) fn exceeds_size_limit(meta: &ResponseMeta, body_len: usize, limit: usize) -> bool {
    if body_len > limit {
        return true;
    }
    matches!(meta.content_length, Some(declared) if declared > limit as u64)
}

//! Crawl lifecycle events
//!
//! Listeners implement [`CrawlListener`], overriding only the callbacks they
//! care about, and are awaited in-line on the control loop. That makes two
//! payloads genuinely mutable: the request descriptor in `on_fetch_start`
//! and the proposal list in `on_discovery_complete` are both read by the
//! engine only after every listener has run.
//!
//! Long-running listener work belongs in a spawned task holding a
//! [`HoldToken`]: the crawl will not report `complete` while any token is
//! alive, and URLs enqueued through the handle before the token drops are
//! crawled first.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use url::Url;

use crate::crawler::{ControlMsg, CrawlHandle};
use crate::queue::QueueItem;
use crate::transport::{RequestDescriptor, ResponseMeta};
use crate::CrawlError;

/// RAII guard deferring crawl completion
///
/// Taken via [`CrawlHandle::hold`]. Dropping it releases the hold and nudges
/// the control loop to re-evaluate completion.
#[derive(Debug)]
pub struct HoldToken {
    holds: Arc<AtomicUsize>,
    tx: mpsc::UnboundedSender<ControlMsg>,
}

impl HoldToken {
    pub(crate) fn new(holds: Arc<AtomicUsize>, tx: mpsc::UnboundedSender<ControlMsg>) -> Self {
        Self { holds, tx }
    }
}

impl Drop for HoldToken {
    fn drop(&mut self) {
        // Decrement first: the wake-up message must observe the new count.
        self.holds.fetch_sub(1, Ordering::SeqCst);
        let _ = self.tx.send(ControlMsg::HoldReleased);
    }
}

/// Observer of crawl lifecycle events
///
/// Every method defaults to a no-op and receives the [`CrawlHandle`], so a
/// listener can enqueue URLs, take holds, or stop the crawl from inside any
/// callback.
#[async_trait]
pub trait CrawlListener: Send {
    /// The crawler entered `Running`
    async fn on_crawl_start(&mut self, _handle: &CrawlHandle) {}

    /// A new item was inserted into the queue
    async fn on_queue_add(&mut self, _handle: &CrawlHandle, _item: &QueueItem) {}

    /// A fetch is about to be issued; the request may still be mutated
    async fn on_fetch_start(
        &mut self,
        _handle: &CrawlHandle,
        _item: &QueueItem,
        _request: &mut RequestDescriptor,
    ) {
    }

    /// A fetch succeeded and its content is available
    async fn on_fetch_complete(
        &mut self,
        _handle: &CrawlHandle,
        _item: &QueueItem,
        _body: &[u8],
        _meta: &ResponseMeta,
    ) {
    }

    /// A response body exceeded the size ceiling
    async fn on_fetch_data_error(&mut self, _handle: &CrawlHandle, _item: &QueueItem) {}

    /// Robots policy forbade fetching this URL
    async fn on_fetch_disallowed(&mut self, _handle: &CrawlHandle, _url: &Url) {}

    /// A redirect response was evaluated
    async fn on_fetch_redirect(&mut self, _handle: &CrawlHandle, _item: &QueueItem) {}

    /// A malformed cookie was encountered on this item's response
    async fn on_cookie_error(&mut self, _handle: &CrawlHandle, _item: &QueueItem, _message: &str) {
    }

    /// The robots.txt fetch for an authority hit a cross-domain redirect
    async fn on_robots_txt_error(&mut self, _handle: &CrawlHandle, _error: &CrawlError) {}

    /// Link candidates were proposed for an item, pre-insertion and mutable
    async fn on_discovery_complete(
        &mut self,
        _handle: &CrawlHandle,
        _item: &QueueItem,
        _proposed: &mut Vec<Url>,
    ) {
    }

    /// The crawl drained naturally
    async fn on_complete(&mut self, _handle: &CrawlHandle) {}
}

/// Registered listeners, invoked in registration order
#[derive(Default)]
pub(crate) struct ListenerSet {
    listeners: Vec<Box<dyn CrawlListener>>,
}

impl ListenerSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, listener: Box<dyn CrawlListener>) {
        self.listeners.push(listener);
    }

    pub(crate) async fn crawl_start(&mut self, handle: &CrawlHandle) {
        for listener in &mut self.listeners {
            listener.on_crawl_start(handle).await;
        }
    }

    pub(crate) async fn queue_add(&mut self, handle: &CrawlHandle, item: &QueueItem) {
        for listener in &mut self.listeners {
            listener.on_queue_add(handle, item).await;
        }
    }

    pub(crate) async fn fetch_start(
        &mut self,
        handle: &CrawlHandle,
        item: &QueueItem,
        request: &mut RequestDescriptor,
    ) {
        for listener in &mut self.listeners {
            listener.on_fetch_start(handle, item, request).await;
        }
    }

    pub(crate) async fn fetch_complete(
        &mut self,
        handle: &CrawlHandle,
        item: &QueueItem,
        body: &[u8],
        meta: &ResponseMeta,
    ) {
        for listener in &mut self.listeners {
            listener.on_fetch_complete(handle, item, body, meta).await;
        }
    }

    pub(crate) async fn fetch_data_error(&mut self, handle: &CrawlHandle, item: &QueueItem) {
        for listener in &mut self.listeners {
            listener.on_fetch_data_error(handle, item).await;
        }
    }

    pub(crate) async fn fetch_disallowed(&mut self, handle: &CrawlHandle, url: &Url) {
        for listener in &mut self.listeners {
            listener.on_fetch_disallowed(handle, url).await;
        }
    }

    pub(crate) async fn fetch_redirect(&mut self, handle: &CrawlHandle, item: &QueueItem) {
        for listener in &mut self.listeners {
            listener.on_fetch_redirect(handle, item).await;
        }
    }

    pub(crate) async fn cookie_error(
        &mut self,
        handle: &CrawlHandle,
        item: &QueueItem,
        message: &str,
    ) {
        for listener in &mut self.listeners {
            listener.on_cookie_error(handle, item, message).await;
        }
    }

    pub(crate) async fn robots_txt_error(&mut self, handle: &CrawlHandle, error: &CrawlError) {
        for listener in &mut self.listeners {
            listener.on_robots_txt_error(handle, error).await;
        }
    }

    pub(crate) async fn discovery_complete(
        &mut self,
        handle: &CrawlHandle,
        item: &QueueItem,
        proposed: &mut Vec<Url>,
    ) {
        for listener in &mut self.listeners {
            listener.on_discovery_complete(handle, item, proposed).await;
        }
    }

    pub(crate) async fn complete(&mut self, handle: &CrawlHandle) {
        for listener in &mut self.listeners {
            listener.on_complete(handle).await;
        }
    }
}

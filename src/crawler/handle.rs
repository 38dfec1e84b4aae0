//! Shared crawl state and the external control surface
//!
//! A [`CrawlHandle`] is a cheap clone of the crawl's shared state plus a
//! sender into the control channel. Listeners receive one in every callback;
//! embedders can grab one from the crawler before `run()`. Everything the
//! handle does goes through atomic reads or control messages, so it is safe
//! to use from any task.

use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use url::Url;

use crate::events::HoldToken;

/// Messages from handles into the control loop
#[derive(Debug)]
pub(crate) enum ControlMsg {
    /// Propose a URL from outside the discovery pipeline
    Enqueue(Url),

    /// Stop the crawl; `immediate` aborts in-flight fetches
    Stop { immediate: bool },

    /// A hold token dropped; re-evaluate completion
    HoldReleased,
}

/// Where the crawl is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlerState {
    /// Built but `run()` not yet called
    Idle,
    /// Control loop is dispatching
    Running,
    /// Stop requested; draining in-flight work
    Stopping,
    /// Control loop has exited
    Stopped,
}

impl CrawlerState {
    fn as_u8(self) -> u8 {
        match self {
            CrawlerState::Idle => 0,
            CrawlerState::Running => 1,
            CrawlerState::Stopping => 2,
            CrawlerState::Stopped => 3,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => CrawlerState::Running,
            2 => CrawlerState::Stopping,
            3 => CrawlerState::Stopped,
            _ => CrawlerState::Idle,
        }
    }
}

/// State shared between the control loop and every handle
#[derive(Debug)]
pub(crate) struct Shared {
    state: AtomicU8,

    /// Outstanding hold tokens; completion waits for zero
    ///
    /// Shared with each token directly so a token can outlive its handle.
    holds: Arc<AtomicUsize>,

    tx: mpsc::UnboundedSender<ControlMsg>,
}

/// External control surface for a running (or about to run) crawl
#[derive(Debug, Clone)]
pub struct CrawlHandle {
    shared: Arc<Shared>,
}

impl CrawlHandle {
    pub(crate) fn new(tx: mpsc::UnboundedSender<ControlMsg>) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: AtomicU8::new(CrawlerState::Idle.as_u8()),
                holds: Arc::new(AtomicUsize::new(0)),
                tx,
            }),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> CrawlerState {
        CrawlerState::from_u8(self.shared.state.load(Ordering::SeqCst))
    }

    /// Defers crawl completion until the returned token is dropped
    ///
    /// The counter is incremented before this returns, so a hold taken
    /// inside a listener callback is visible to the control loop before it
    /// can next evaluate completion. URLs enqueued before the token drops
    /// are observed before the crawl can complete.
    pub fn hold(&self) -> HoldToken {
        self.shared.holds.fetch_add(1, Ordering::SeqCst);
        HoldToken::new(Arc::clone(&self.shared.holds), self.shared.tx.clone())
    }

    /// Proposes a URL from outside the discovery pipeline
    ///
    /// The URL goes through the same dedup, depth, and domain gates as a
    /// discovered link, at depth 0 with no referrer. Insertion is observable
    /// through the `queueadd` event. A message to a crawl that has already
    /// finished is dropped.
    pub fn enqueue(&self, url: Url) {
        let _ = self.shared.tx.send(ControlMsg::Enqueue(url));
    }

    /// Requests the crawl stop
    ///
    /// `immediate = true` aborts in-flight fetches; `false` stops dispatch
    /// but lets in-flight fetches finish and be fully processed. Neither
    /// form emits `complete`.
    pub fn stop(&self, immediate: bool) {
        let _ = self.shared.tx.send(ControlMsg::Stop { immediate });
    }

    pub(crate) fn set_state(&self, state: CrawlerState) {
        self.shared.state.store(state.as_u8(), Ordering::SeqCst);
    }

    /// Outstanding hold tokens
    pub(crate) fn holds(&self) -> usize {
        self.shared.holds.load(Ordering::SeqCst)
    }
}

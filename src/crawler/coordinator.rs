//! Crawl orchestration
//!
//! One cooperative control loop owns every piece of mutable crawl state:
//! the queue, the cookie jar, the robots.txt cache, and the listener set.
//! Fetches run concurrently on spawned tasks, but their outcomes are
//! processed one at a time back on the loop, so no component here needs a
//! lock. The loop multiplexes three sources:
//! - an interval tick that dispatches queued items up to the concurrency
//!   bound
//! - completed fetch tasks, keyed by the item's fingerprint
//! - control messages from [`CrawlHandle`] clones (enqueue, stop) and
//!   hold-token releases
//!
//! The crawl completes when the queue holds no `Queued` items, no fetch is
//! in flight, and no hold token is outstanding.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use url::Url;

use crate::config::CrawlConfig;
use crate::cookies::CookieJar;
use crate::crawler::builder::CrawlerBuilder;
use crate::crawler::domain_policy::DomainPolicy;
use crate::crawler::fetcher::{self, ResponseClass};
use crate::crawler::handle::{ControlMsg, CrawlHandle, CrawlerState};
use crate::discover::LinkExtractor;
use crate::events::ListenerSet;
use crate::queue::{ItemStatus, Queue, QueueItem};
use crate::robots::RobotsTxtManager;
use crate::transport::{HttpTransport, ResponseMeta, Transport, TransportError, TransportEvent};
use crate::url::{host_of, is_crawlable, same_host};
use crate::{CrawlError, Result};

/// Outcome of one spawned fetch, keyed by the item's fingerprint.
type FetchOutcome = (String, std::result::Result<TransportEvent, TransportError>);

/// The crawl engine
///
/// Build one with [`Crawler::builder`], then drive it with [`Crawler::run`].
/// After `run` returns, the queue and cookie jar remain available for
/// inspection, and calling `run` again resumes whatever is still queued.
///
/// # Example
///
/// ```no_run
/// use kumo::Crawler;
///
/// # async fn demo() -> kumo::Result<()> {
/// let mut crawler = Crawler::new("https://example.com/");
/// crawler.run().await?;
/// println!("fetched {} resources", crawler.queue().len());
/// # Ok(())
/// # }
/// ```
pub struct Crawler {
    pub(crate) config: Arc<CrawlConfig>,
    pub(crate) seed: String,
    pub(crate) queue: Queue,
    pub(crate) jar: CookieJar,
    pub(crate) robots: RobotsTxtManager,
    pub(crate) domain: DomainPolicy,
    pub(crate) listeners: ListenerSet,
    pub(crate) transport: Option<Arc<dyn Transport>>,
    pub(crate) extractor: Box<dyn LinkExtractor>,
    pub(crate) handle: CrawlHandle,
    pub(crate) control_rx: Option<mpsc::UnboundedReceiver<ControlMsg>>,
    /// Host the crawl is currently confined to. Set from the seed, and
    /// updated when an allowed initial-chain redirect lands elsewhere.
    pub(crate) home_host: Option<String>,
    /// Fingerprint of the newest link in the seed's redirect chain.
    pub(crate) chain_tip: Option<String>,
    /// False once the seed's chain has produced a non-redirect outcome.
    pub(crate) chain_open: bool,
}

impl Crawler {
    /// Creates a crawler with default configuration for the given seed URL
    ///
    /// The seed is validated when [`Crawler::run`] is called, not here.
    pub fn new(seed: impl Into<String>) -> Self {
        CrawlerBuilder::new(seed).build()
    }

    /// Starts building a crawler for the given seed URL
    pub fn builder(seed: impl Into<String>) -> CrawlerBuilder {
        CrawlerBuilder::new(seed)
    }

    /// Returns a cloneable handle for steering this crawl from other tasks
    pub fn handle(&self) -> CrawlHandle {
        self.handle.clone()
    }

    /// The URL frontier, including every item the crawl has seen
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// The cookie jar accumulated from Set-Cookie response headers
    pub fn cookies(&self) -> &CookieJar {
        &self.jar
    }

    /// Mutable access to the cookie jar, for pre-loading cookies
    pub fn cookies_mut(&mut self) -> &mut CookieJar {
        &mut self.jar
    }

    /// The configuration this crawler was built with
    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Runs the crawl to completion or until stopped
    ///
    /// On a fresh crawler the seed is queued first; on a crawler whose
    /// queue was defrosted or left over from a stopped run, the remaining
    /// `Queued` items are picked up where they were left.
    pub async fn run(&mut self) -> Result<()> {
        self.config.validate()?;

        let seed = Url::parse(&self.seed).map_err(|e| CrawlError::Seed {
            url: self.seed.clone(),
            message: e.to_string(),
        })?;
        if !is_crawlable(&seed) {
            return Err(CrawlError::Seed {
                url: self.seed.clone(),
                message: "seed must be an absolute http or https URL".to_string(),
            });
        }

        let transport = match &self.transport {
            Some(transport) => Arc::clone(transport),
            None => {
                let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new()?);
                self.transport = Some(Arc::clone(&transport));
                transport
            }
        };

        // The receiver is restored below; it can only be absent if a
        // previous run panicked between take and restore.
        let mut control_rx = match self.control_rx.take() {
            Some(rx) => rx,
            None => return Err(CrawlError::Busy),
        };

        self.home_host = host_of(&seed);
        self.chain_tip = Some(crate::url::fingerprint(&seed));
        self.chain_open = true;

        // The seed is queued silently: the first queueadd a listener
        // observes belongs to a discovered URL.
        self.queue.add(seed.clone(), None, 0);

        self.handle.set_state(CrawlerState::Running);
        tracing::info!("Crawl starting from {}", seed);
        self.listeners.crawl_start(&self.handle).await;

        let result = self.run_loop(&mut control_rx, transport).await;

        self.control_rx = Some(control_rx);
        self.handle.set_state(CrawlerState::Stopped);
        result
    }

    async fn run_loop(
        &mut self,
        control_rx: &mut mpsc::UnboundedReceiver<ControlMsg>,
        transport: Arc<dyn Transport>,
    ) -> Result<()> {
        let mut interval = tokio::time::interval(Duration::from_millis(self.config.interval_ms));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut join_set: JoinSet<FetchOutcome> = JoinSet::new();
        let mut stopping = false;

        'run: loop {
            tokio::select! {
                _ = interval.tick() => {
                    if !stopping {
                        self.dispatch_ready(&transport, &mut join_set).await?;
                    }
                }
                Some(joined) = join_set.join_next(), if !join_set.is_empty() => {
                    match joined {
                        Ok((fingerprint, outcome)) => {
                            self.process_outcome(&fingerprint, outcome).await?;
                        }
                        Err(e) if e.is_panic() => {
                            tracing::error!("Fetch task panicked: {}", e);
                        }
                        Err(_) => {}
                    }
                }
                Some(msg) = control_rx.recv() => {
                    if self.apply_control(msg, &mut join_set, &mut stopping).await? {
                        break 'run;
                    }
                }
            }

            // Drain everything already sent before judging completion, so
            // an enqueue sent ahead of a hold release is never overtaken.
            while let Ok(msg) = control_rx.try_recv() {
                if self.apply_control(msg, &mut join_set, &mut stopping).await? {
                    break 'run;
                }
            }

            if stopping && join_set.is_empty() {
                tracing::info!(
                    "Crawl stopped with {} items still queued",
                    self.queue.count_queued()
                );
                break;
            }

            if !stopping
                && self.queue.count_queued() == 0
                && join_set.is_empty()
                && self.handle.holds() == 0
            {
                tracing::info!("Crawl complete after {} items", self.queue.len());
                self.listeners.complete(&self.handle).await;
                break;
            }
        }

        Ok(())
    }

    /// Applies one control message. Returns `true` when the loop must exit.
    async fn apply_control(
        &mut self,
        msg: ControlMsg,
        join_set: &mut JoinSet<FetchOutcome>,
        stopping: &mut bool,
    ) -> Result<bool> {
        match msg {
            ControlMsg::Enqueue(url) => {
                self.propose_url(url, None, 0).await;
                Ok(false)
            }
            ControlMsg::Stop { immediate: true } => {
                tracing::info!(
                    "Immediate stop requested, aborting {} in-flight fetches",
                    join_set.len()
                );
                self.handle.set_state(CrawlerState::Stopping);
                join_set.shutdown().await;
                Ok(true)
            }
            ControlMsg::Stop { immediate: false } => {
                if !*stopping {
                    tracing::info!(
                        "Stop requested, draining {} in-flight fetches",
                        join_set.len()
                    );
                    *stopping = true;
                    self.handle.set_state(CrawlerState::Stopping);
                }
                Ok(false)
            }
            // The wake-up alone suffices; the completion check runs after
            // every drain.
            ControlMsg::HoldReleased => Ok(false),
        }
    }

    /// Moves queued items into flight until the concurrency bound is met.
    async fn dispatch_ready(
        &mut self,
        transport: &Arc<dyn Transport>,
        join_set: &mut JoinSet<FetchOutcome>,
    ) -> Result<()> {
        let capacity = (self.config.concurrency as usize).saturating_sub(join_set.len());
        for _ in 0..capacity {
            let Some(fingerprint) = self.queue.next_queued() else {
                break;
            };
            self.dispatch_item(&fingerprint, transport, join_set).await?;
        }
        Ok(())
    }

    /// Runs the pre-fetch pipeline for one item and spawns its fetch
    ///
    /// Robots.txt is resolved inline before the first fetch on an
    /// authority, so sitemap proposals and disallow verdicts land before
    /// any request is sent there.
    async fn dispatch_item(
        &mut self,
        fingerprint: &str,
        transport: &Arc<dyn Transport>,
        join_set: &mut JoinSet<FetchOutcome>,
    ) -> Result<()> {
        let item = self.queue.update_status(fingerprint, ItemStatus::Spooled)?.clone();
        tracing::debug!("Dispatching {} at depth {}", item.url, item.depth);

        if self.config.respect_robots_txt {
            match self.robots.ensure_fetched(transport.as_ref(), &item.url).await {
                Ok(sitemaps) => {
                    for sitemap in sitemaps {
                        self.propose_url(sitemap, None, 0).await;
                    }
                }
                Err(error) => {
                    tracing::warn!("Robots policy refused {}: {}", item.url, error);
                    self.listeners.robots_txt_error(&self.handle, &error).await;
                    self.queue.update_status(fingerprint, ItemStatus::Failed)?;
                    self.close_chain_if_tip(fingerprint);
                    return Ok(());
                }
            }

            if !self.robots.is_allowed(&item.url) {
                tracing::debug!("Disallowed by robots.txt: {}", item.url);
                self.listeners.fetch_disallowed(&self.handle, &item.url).await;
                self.queue.update_status(fingerprint, ItemStatus::NotFound)?;
                self.close_chain_if_tip(fingerprint);
                return Ok(());
            }
        }

        let mut request = fetcher::build_request(&item, &self.config, &self.jar);
        self.listeners.fetch_start(&self.handle, &item, &mut request).await;
        self.queue.update_status(fingerprint, ItemStatus::Downloading)?;

        let transport = Arc::clone(transport);
        let key = fingerprint.to_string();
        join_set.spawn(async move {
            let outcome = transport.run(&request).await;
            (key, outcome)
        });
        Ok(())
    }

    /// Routes one completed fetch back through the lifecycle.
    async fn process_outcome(
        &mut self,
        fingerprint: &str,
        outcome: std::result::Result<TransportEvent, TransportError>,
    ) -> Result<()> {
        match outcome {
            Ok(TransportEvent::Response { meta, body }) => {
                self.process_response(fingerprint, meta, body).await
            }
            Ok(TransportEvent::Redirect { code, location }) => {
                self.process_redirect(fingerprint, code, &location).await
            }
            Err(TransportError::BodyTooLarge { url, limit }) => {
                tracing::warn!("Body of {} exceeded the {} byte ceiling", url, limit);
                let item = self.finish_item(fingerprint, ItemStatus::Failed)?;
                self.listeners.fetch_data_error(&self.handle, &item).await;
                Ok(())
            }
            Err(error) => {
                tracing::warn!("Fetch failed: {}", error);
                self.finish_item(fingerprint, ItemStatus::Failed)?;
                Ok(())
            }
        }
    }

    async fn process_response(
        &mut self,
        fingerprint: &str,
        meta: ResponseMeta,
        body: Vec<u8>,
    ) -> Result<()> {
        // Cookies are merged from every response, even error pages. A
        // malformed header is reported but never ends the crawl.
        if !meta.set_cookie.is_empty() {
            let host = self.queue.get(fingerprint).map(|item| item.host.clone());
            if let Some(host) = host {
                if let Err(error) = self.jar.add_from_response(&host, &meta.set_cookie) {
                    tracing::warn!("Rejected cookie from {}: {}", host, error);
                    if let Some(item) = self.queue.get(fingerprint) {
                        let item = item.clone();
                        self.listeners
                            .cookie_error(&self.handle, &item, &error.to_string())
                            .await;
                    }
                }
            }
        }

        // The transport enforces the ceiling while streaming; this catches
        // declared lengths and scripted transports that never stream.
        if fetcher::exceeds_size_limit(&meta, body.len(), self.config.max_resource_size) {
            let item = self.finish_item(fingerprint, ItemStatus::Failed)?;
            self.listeners.fetch_data_error(&self.handle, &item).await;
            return Ok(());
        }

        if let Some(state) = self.queue.state_data_mut(fingerprint) {
            state.code = Some(meta.code);
            state.content_type = meta.content_type.clone();
            state.content_length = meta.content_length;
            state.received_length = Some(body.len() as u64);
        }

        match fetcher::classify_status(meta.code) {
            ResponseClass::Success => {
                let item = self.finish_item(fingerprint, ItemStatus::Downloaded)?;
                tracing::debug!("Downloaded {} ({} bytes)", item.url, body.len());
                self.listeners
                    .fetch_complete(&self.handle, &item, &body, &meta)
                    .await;
                if self.config.discover_resources {
                    self.run_discovery(&item, &body, &meta).await;
                }
                Ok(())
            }
            ResponseClass::NotFound => {
                let item = self.finish_item(fingerprint, ItemStatus::NotFound)?;
                tracing::debug!("Resource gone ({}): {}", meta.code, item.url);
                Ok(())
            }
            ResponseClass::Failure => {
                let item = self.finish_item(fingerprint, ItemStatus::Failed)?;
                tracing::warn!("HTTP {} for {}", meta.code, item.url);
                Ok(())
            }
        }
    }

    /// Handles a redirect response: records it, reports it, and decides
    /// whether the target may be followed
    ///
    /// Redirect targets inherit the source item's depth; a chain of hops
    /// counts as one link. While the seed's initial chain is open, a hop to
    /// another host may be admitted by configuration, and moves the crawl's
    /// home host with it.
    async fn process_redirect(
        &mut self,
        fingerprint: &str,
        code: u16,
        location: &str,
    ) -> Result<()> {
        let source = match self.queue.get(fingerprint) {
            Some(item) => item.clone(),
            None => return Err(CrawlError::UnknownItem { fingerprint: fingerprint.to_string() }),
        };

        let target = match source.url.join(location) {
            Ok(target) => target,
            Err(e) => {
                tracing::warn!("Unresolvable redirect target from {}: {}", source.url, e);
                self.finish_item(fingerprint, ItemStatus::Failed)?;
                return Ok(());
            }
        };

        let is_chain_hop = self.chain_open && self.chain_tip.as_deref() == Some(fingerprint);

        if let Some(state) = self.queue.state_data_mut(fingerprint) {
            state.code = Some(code);
            state.final_url = Some(target.to_string());
        }
        let item = self.queue.update_status(fingerprint, ItemStatus::Redirected)?.clone();
        tracing::debug!("Redirect {} -> {}", item.url, target);
        self.listeners.fetch_redirect(&self.handle, &item).await;

        let Some(target_host) = host_of(&target) else {
            if is_chain_hop {
                self.chain_open = false;
            }
            return Ok(());
        };

        let allowed = match &self.home_host {
            Some(home) => self.domain.may_follow(home, &target_host, is_chain_hop),
            None => true,
        };
        if !allowed {
            tracing::debug!("Refusing redirect to foreign host {}", target_host);
            if is_chain_hop {
                self.chain_open = false;
            }
            return Ok(());
        }

        if is_chain_hop {
            if let Some(home) = &self.home_host {
                if !same_host(home, &target_host) {
                    tracing::info!("Initial redirect chain moved the crawl to {}", target_host);
                    self.home_host = Some(target_host.clone());
                }
            }
            self.chain_tip = Some(crate::url::fingerprint(&target));
        }

        self.propose_url(target, Some(source.url.clone()), source.depth).await;
        Ok(())
    }

    /// Scans a downloaded body for links and proposes the survivors.
    async fn run_discovery(&mut self, item: &QueueItem, body: &[u8], meta: &ResponseMeta) {
        let extracted = self
            .extractor
            .extract(body, meta.content_type.as_deref(), &item.url)
            .await;

        let mut proposals: Vec<Url> = if extracted.nofollow {
            Vec::new()
        } else {
            let parse_scripts = self.config.parse_script_tags;
            extracted
                .candidates
                .into_iter()
                .filter(|candidate| parse_scripts || !candidate.from_script)
                .map(|candidate| candidate.url)
                .collect()
        };

        tracing::debug!("Discovered {} links in {}", proposals.len(), item.url);
        self.listeners
            .discovery_complete(&self.handle, item, &mut proposals)
            .await;

        for url in proposals {
            self.propose_url(url, Some(item.url.clone()), item.depth + 1).await;
        }
    }

    /// Admits a URL into the queue if it survives every gate
    ///
    /// Gates, in order: crawlable scheme, depth ceiling, home-host policy,
    /// fingerprint dedup. Insertion emits `queueadd`; every rejection is
    /// silent. Returns whether the URL was inserted.
    async fn propose_url(&mut self, url: Url, referrer: Option<Url>, depth: u32) -> bool {
        if !is_crawlable(&url) {
            return false;
        }
        if self.config.max_depth != 0 && depth >= self.config.max_depth {
            tracing::trace!("Dropping {} at depth {}", url, depth);
            return false;
        }
        let Some(host) = host_of(&url) else {
            return false;
        };
        if let Some(home) = &self.home_host {
            if !self.domain.may_follow(home, &host, false) {
                tracing::trace!("Refusing foreign-host candidate {}", url);
                return false;
            }
        }

        let (item, inserted) = self.queue.add(url, referrer, depth);
        if !inserted {
            return false;
        }
        let item = item.clone();
        self.listeners.queue_add(&self.handle, &item).await;
        true
    }

    /// Applies a terminal status and closes the initial chain when the
    /// finished item was its tip.
    fn finish_item(&mut self, fingerprint: &str, status: ItemStatus) -> Result<QueueItem> {
        let item = self.queue.update_status(fingerprint, status)?.clone();
        self.close_chain_if_tip(fingerprint);
        Ok(item)
    }

    fn close_chain_if_tip(&mut self, fingerprint: &str) {
        if self.chain_open && self.chain_tip.as_deref() == Some(fingerprint) {
            self.chain_open = false;
        }
    }
}

impl std::fmt::Debug for Crawler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crawler")
            .field("seed", &self.seed)
            .field("queue_len", &self.queue.len())
            .field("state", &self.handle.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn crawler_with(config: CrawlConfig) -> Crawler {
        let mut crawler = Crawler::builder("http://example.com/").config(config).build();
        crawler.home_host = Some("example.com".to_string());
        crawler
    }

    #[tokio::test]
    async fn test_propose_url_inserts_and_dedupes() {
        let mut crawler = crawler_with(CrawlConfig::default());
        assert!(crawler.propose_url(url("http://example.com/a"), None, 1).await);
        assert!(!crawler.propose_url(url("http://example.com/a"), None, 1).await);
        assert_eq!(crawler.queue.len(), 1);
    }

    #[tokio::test]
    async fn test_propose_url_fragment_variants_collapse() {
        let mut crawler = crawler_with(CrawlConfig::default());
        assert!(crawler.propose_url(url("http://example.com/a#top"), None, 1).await);
        assert!(!crawler.propose_url(url("http://example.com/a#bottom"), None, 1).await);
    }

    #[tokio::test]
    async fn test_propose_url_depth_ceiling() {
        let config = CrawlConfig {
            max_depth: 2,
            ..CrawlConfig::default()
        };
        let mut crawler = crawler_with(config);
        assert!(crawler.propose_url(url("http://example.com/ok"), None, 1).await);
        assert!(!crawler.propose_url(url("http://example.com/deep"), None, 2).await);
        assert!(!crawler.propose_url(url("http://example.com/deeper"), None, 3).await);
    }

    #[tokio::test]
    async fn test_propose_url_zero_max_depth_is_unlimited() {
        let mut crawler = crawler_with(CrawlConfig::default());
        assert!(crawler.propose_url(url("http://example.com/deep"), None, 900).await);
    }

    #[tokio::test]
    async fn test_propose_url_refuses_foreign_host() {
        let mut crawler = crawler_with(CrawlConfig::default());
        assert!(!crawler.propose_url(url("http://other.com/"), None, 1).await);
        assert!(crawler.queue.is_empty());
    }

    #[tokio::test]
    async fn test_propose_url_refuses_non_http_scheme() {
        let mut crawler = crawler_with(CrawlConfig::default());
        assert!(!crawler.propose_url(url("ftp://example.com/file"), None, 1).await);
        assert!(!crawler.propose_url(url("mailto:me@example.com"), None, 1).await);
    }

    #[tokio::test]
    async fn test_finish_item_closes_chain_only_for_tip() {
        let mut crawler = crawler_with(CrawlConfig::default());
        crawler.propose_url(url("http://example.com/a"), None, 1).await;
        crawler.propose_url(url("http://example.com/b"), None, 1).await;
        let fp_a = crate::url::fingerprint(&url("http://example.com/a"));
        let fp_b = crate::url::fingerprint(&url("http://example.com/b"));
        crawler.chain_tip = Some(fp_a.clone());
        crawler.chain_open = true;

        crawler.queue.update_status(&fp_b, ItemStatus::Spooled).unwrap();
        crawler.finish_item(&fp_b, ItemStatus::Failed).unwrap();
        assert!(crawler.chain_open);

        crawler.queue.update_status(&fp_a, ItemStatus::Spooled).unwrap();
        crawler.finish_item(&fp_a, ItemStatus::Failed).unwrap();
        assert!(!crawler.chain_open);
    }

    #[tokio::test]
    async fn test_apply_control_stop_marks_stopping() {
        let mut crawler = crawler_with(CrawlConfig::default());
        let mut join_set: JoinSet<FetchOutcome> = JoinSet::new();
        let mut stopping = false;

        let exit = crawler
            .apply_control(ControlMsg::Stop { immediate: false }, &mut join_set, &mut stopping)
            .await
            .unwrap();
        assert!(!exit);
        assert!(stopping);
        assert_eq!(crawler.handle.state(), CrawlerState::Stopping);
    }

    #[tokio::test]
    async fn test_apply_control_immediate_stop_exits() {
        let mut crawler = crawler_with(CrawlConfig::default());
        let mut join_set: JoinSet<FetchOutcome> = JoinSet::new();
        let mut stopping = false;

        let exit = crawler
            .apply_control(ControlMsg::Stop { immediate: true }, &mut join_set, &mut stopping)
            .await
            .unwrap();
        assert!(exit);
    }

    #[tokio::test]
    async fn test_apply_control_enqueue_adds_at_depth_zero() {
        let mut crawler = crawler_with(CrawlConfig::default());
        let mut join_set: JoinSet<FetchOutcome> = JoinSet::new();
        let mut stopping = false;

        crawler
            .apply_control(
                ControlMsg::Enqueue(url("http://example.com/extra")),
                &mut join_set,
                &mut stopping,
            )
            .await
            .unwrap();
        let item = crawler.queue.get_by_url(&url("http://example.com/extra")).unwrap();
        assert_eq!(item.depth, 0);
    }

    #[tokio::test]
    async fn test_run_rejects_unparseable_seed() {
        let mut crawler = Crawler::new("not a url");
        let err = crawler.run().await.unwrap_err();
        assert!(matches!(err, CrawlError::Seed { .. }));
    }

    #[tokio::test]
    async fn test_run_rejects_non_http_seed() {
        let mut crawler = Crawler::new("ftp://example.com/");
        let err = crawler.run().await.unwrap_err();
        assert!(matches!(err, CrawlError::Seed { .. }));
    }

    #[tokio::test]
    async fn test_run_rejects_invalid_config() {
        let config = CrawlConfig {
            concurrency: 0,
            ..CrawlConfig::default()
        };
        let mut crawler = Crawler::builder("http://example.com/").config(config).build();
        let err = crawler.run().await.unwrap_err();
        assert!(matches!(err, CrawlError::Config(_)));
    }
}

//! Fluent construction of a [`Crawler`]

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::CrawlConfig;
use crate::cookies::CookieJar;
use crate::crawler::coordinator::Crawler;
use crate::crawler::domain_policy::DomainPolicy;
use crate::crawler::handle::CrawlHandle;
use crate::discover::{HtmlLinkExtractor, LinkExtractor};
use crate::events::{CrawlListener, ListenerSet};
use crate::queue::Queue;
use crate::robots::RobotsTxtManager;
use crate::transport::Transport;

/// Builder for [`Crawler`]
///
/// Only the seed URL is required; every other knob has a default. Building
/// never fails: the seed and configuration are validated by
/// [`Crawler::run`].
///
/// # Example
///
/// ```
/// use kumo::{config::CrawlConfig, Crawler};
///
/// let config = CrawlConfig {
///     max_depth: 3,
///     ..CrawlConfig::default()
/// };
/// let crawler = Crawler::builder("https://example.com/")
///     .config(config)
///     .build();
/// assert_eq!(crawler.config().max_depth, 3);
/// ```
pub struct CrawlerBuilder {
    seed: String,
    config: CrawlConfig,
    transport: Option<Arc<dyn Transport>>,
    extractor: Option<Box<dyn LinkExtractor>>,
    listeners: Vec<Box<dyn CrawlListener>>,
    queue: Option<Queue>,
}

impl CrawlerBuilder {
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            config: CrawlConfig::default(),
            transport: None,
            extractor: None,
            listeners: Vec::new(),
            queue: None,
        }
    }

    /// Replaces the default configuration.
    pub fn config(mut self, config: CrawlConfig) -> Self {
        self.config = config;
        self
    }

    /// Substitutes the transport used for every request, robots.txt
    /// included. Defaults to the bundled reqwest transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Substitutes the link extractor run on downloaded documents.
    /// Defaults to [`HtmlLinkExtractor`].
    pub fn extractor<E>(mut self, extractor: E) -> Self
    where
        E: LinkExtractor + 'static,
    {
        self.extractor = Some(Box::new(extractor));
        self
    }

    /// Registers a lifecycle listener. Listeners are notified in
    /// registration order; call this repeatedly to register several.
    pub fn listener<L>(mut self, listener: L) -> Self
    where
        L: CrawlListener + 'static,
    {
        self.listeners.push(Box::new(listener));
        self
    }

    /// Seeds the crawler with an existing queue, typically one restored
    /// with [`Queue::defrost`].
    pub fn queue(mut self, queue: Queue) -> Self {
        self.queue = Some(queue);
        self
    }

    pub fn build(self) -> Crawler {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = CrawlHandle::new(tx);
        let robots = RobotsTxtManager::new(&self.config);
        let domain = DomainPolicy::new(&self.config);
        let mut listeners = ListenerSet::new();
        for listener in self.listeners {
            listeners.push(listener);
        }

        Crawler {
            config: Arc::new(self.config),
            seed: self.seed,
            queue: self.queue.unwrap_or_default(),
            jar: CookieJar::new(),
            robots,
            domain,
            listeners,
            transport: self.transport,
            extractor: self
                .extractor
                .unwrap_or_else(|| Box::new(HtmlLinkExtractor::new())),
            handle,
            control_rx: Some(rx),
            home_host: None,
            chain_tip: None,
            chain_open: false,
        }
    }
}

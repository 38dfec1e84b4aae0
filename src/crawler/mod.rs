//! Crawl engine: scheduling, fetching, and policy
//!
//! This module ties the rest of the crate together:
//! - [`Crawler`] owns the queue, cookie jar, robots.txt cache, and
//!   listener set, and drives the interval-paced crawl loop
//! - [`CrawlerBuilder`] wires configuration, transport, extractor, and
//!   listeners into a crawler
//! - [`CrawlHandle`] steers a running crawl from other tasks: enqueue,
//!   stop, and hold tokens that delay completion
//!
//! Fetches run concurrently up to the configured bound, but all state
//! mutation happens on the crawl loop itself.

mod builder;
mod coordinator;
mod domain_policy;
mod fetcher;
mod handle;

pub use builder::CrawlerBuilder;
pub use coordinator::Crawler;
pub use handle::{CrawlHandle, CrawlerState};

pub(crate) use handle::ControlMsg;

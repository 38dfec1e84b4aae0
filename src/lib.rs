//! Kumo: a polite, resumable web-crawling engine
//!
//! Given a seed URL, kumo discovers and fetches linked resources breadth-first
//! up to a configurable depth, obeying per-host robots.txt policy, managing
//! per-host cookies, enforcing a body-size ceiling, and emitting lifecycle
//! events that let embedding code inspect, filter, or extend discovery while
//! the crawl is running.

pub mod config;
pub mod cookies;
pub mod crawler;
pub mod discover;
pub mod events;
pub mod queue;
pub mod robots;
pub mod transport;
pub mod url;

use thiserror::Error;

/// Main error type for kumo operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid seed URL '{url}': {message}")]
    Seed { url: String, message: String },

    #[error("Crawl loop is already running")]
    Busy,

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Cookie error: {0}")]
    Cookie(#[from] CookieError),

    #[error("Robots.txt for {host} redirected to a disallowed domain: {target}")]
    RobotsCrossDomain { host: String, target: String },

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: queue::ItemStatus,
        to: queue::ItemStatus,
    },

    #[error("Unknown queue item: {fingerprint}")]
    UnknownItem { fingerprint: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Queue snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors produced by a transport capability
///
/// `Http` and `Timeout` come from the bundled reqwest transport; scripted
/// test transports use `Connection` to simulate network failures.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connection { url: String, message: String },

    #[error("Response body for {url} exceeds the {limit} byte ceiling")]
    BodyTooLarge { url: String, limit: usize },

    #[error("Redirect response from {url} carries no Location header")]
    MissingLocation { url: String },
}

/// Cookie parsing errors
#[derive(Debug, Error)]
pub enum CookieError {
    #[error("Malformed Set-Cookie header: {0}")]
    Malformed(String),

    #[error("Cookie line has an empty name: {0}")]
    EmptyName(String),
}

/// Result type alias for kumo operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::CrawlConfig;
pub use crawler::{CrawlHandle, Crawler, CrawlerBuilder, CrawlerState};
pub use discover::{ExtractedLinks, HtmlLinkExtractor, LinkCandidate, LinkExtractor};
pub use events::{CrawlListener, HoldToken};
pub use queue::{ItemStatus, Queue, QueueItem, StateData};
pub use transport::{
    HttpTransport, RequestDescriptor, ResponseMeta, Transport, TransportEvent,
};

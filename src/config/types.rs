use serde::{Deserialize, Serialize};

use crate::config::validation::validate;
use crate::ConfigError;

/// Default body-size ceiling: 16 MiB, matching common crawler practice.
pub const DEFAULT_MAX_RESOURCE_SIZE: usize = 16 * 1024 * 1024;

/// Crawl behavior configuration
///
/// Every field has a default, so an empty TOML document (or
/// `CrawlConfig::default()`) yields a usable configuration. Keys use
/// kebab-case in TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct CrawlConfig {
    /// Milliseconds between scheduler ticks
    pub interval_ms: u64,

    /// Maximum link depth from the seed; 0 means unlimited
    pub max_depth: u32,

    /// Maximum number of fetches in flight at once
    pub concurrency: u32,

    /// Whether robots.txt is fetched and obeyed
    pub respect_robots_txt: bool,

    /// Whether `<script src>` style links are eligible for discovery
    pub parse_script_tags: bool,

    /// Whether fetched documents are scanned for further links at all
    pub discover_resources: bool,

    /// Whether the seed's own redirect chain may land on a different host
    pub allow_initial_domain_change: bool,

    /// Maximum response body size in bytes
    pub max_resource_size: usize,

    /// User-agent string sent with every request and used for robots matching
    pub user_agent: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            interval_ms: 250,
            max_depth: 0,
            concurrency: 5,
            respect_robots_txt: true,
            parse_script_tags: true,
            discover_resources: true,
            allow_initial_domain_change: false,
            max_resource_size: DEFAULT_MAX_RESOURCE_SIZE,
            user_agent: format!("kumo/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_secs: 30,
        }
    }
}

impl CrawlConfig {
    /// Parses a configuration from a TOML document and validates it
    ///
    /// # Example
    ///
    /// ```
    /// use kumo::config::CrawlConfig;
    ///
    /// let config = CrawlConfig::from_toml_str("max-depth = 3").unwrap();
    /// assert_eq!(config.max_depth, 3);
    /// assert_eq!(config.concurrency, 5);
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: CrawlConfig = toml::from_str(content)?;
        validate(&config)?;
        Ok(config)
    }

    /// Validates field ranges, returning the first violation found
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate(self)
    }
}

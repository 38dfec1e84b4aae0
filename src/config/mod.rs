//! Configuration module for kumo
//!
//! The engine takes one immutable [`CrawlConfig`] value at construction;
//! every component receives it explicitly rather than reading ambient state,
//! so concurrent crawl sessions with different settings are safe.
//!
//! # Example
//!
//! ```
//! use kumo::config::CrawlConfig;
//!
//! let config = CrawlConfig::from_toml_str("max-depth = 2\nconcurrency = 1").unwrap();
//! assert_eq!(config.max_depth, 2);
//! ```

mod types;
mod validation;

// Re-export types
pub use types::{CrawlConfig, DEFAULT_MAX_RESOURCE_SIZE};

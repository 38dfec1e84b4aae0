//! Robots.txt policy parsing
//!
//! Allow/disallow matching is delegated to the robotstxt crate. `Sitemap:`
//! directives, which that crate does not surface, are collected by a line
//! scan so the crawler can propose them to the queue.

use chrono::{DateTime, Utc};
use robotstxt::DefaultMatcher;
use url::Url;

/// Parsed robots.txt policy for one authority
///
/// Immutable once built: the crawler caches one of these per `host:port` for
/// the lifetime of the crawl.
#[derive(Debug, Clone)]
pub struct RobotsPolicy {
    /// Raw robots.txt content (empty string means allow all)
    content: String,
    /// Whether to allow all (true = allow all, false = match content)
    allow_all: bool,
    /// Absolute URLs from `Sitemap:` directives, in file order
    sitemap_urls: Vec<Url>,
    /// When the robots.txt was fetched
    fetched_at: DateTime<Utc>,
}

impl RobotsPolicy {
    /// Creates a new RobotsPolicy from raw robots.txt content
    ///
    /// # Arguments
    ///
    /// * `content` - The raw robots.txt file content
    ///
    /// # Returns
    ///
    /// A RobotsPolicy instance that can answer URL permission checks and
    /// report any sitemap URLs the file declared
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
            allow_all: false,
            sitemap_urls: extract_sitemaps(content),
            fetched_at: Utc::now(),
        }
    }

    /// Creates a permissive RobotsPolicy that allows everything
    ///
    /// This is the fallback when robots.txt cannot be fetched (network
    /// error or a non-2xx response).
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
            allow_all: true,
            sitemap_urls: Vec::new(),
            fetched_at: Utc::now(),
        }
    }

    /// Checks if a path is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `path` - The URL path to check, with query if any (e.g. "/page?x=1")
    /// * `user_agent` - The user agent string
    ///
    /// # Returns
    ///
    /// * `true` - If the path is allowed
    /// * `false` - If the path is disallowed
    pub fn is_allowed(&self, path: &str, user_agent: &str) -> bool {
        if self.allow_all || self.content.is_empty() {
            return true;
        }

        // Parse and match on-demand
        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, path)
    }

    /// URLs declared by `Sitemap:` directives, in file order
    pub fn sitemap_urls(&self) -> &[Url] {
        &self.sitemap_urls
    }

    /// When this policy was fetched
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}

/// Collects `Sitemap:` directive values as absolute URLs
///
/// The directive name is case-insensitive and sitemap lines live outside
/// user-agent groups, so a flat scan is enough. Values that do not parse as
/// absolute URLs are skipped.
fn extract_sitemaps(content: &str) -> Vec<Url> {
    content
        .lines()
        .filter_map(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                return None;
            }
            let (key, value) = trimmed.split_once(':')?;
            if !key.trim().eq_ignore_ascii_case("sitemap") {
                return None;
            }
            Url::parse(value.trim()).ok()
        })
        .collect()
}

//! Robots.txt handling module
//!
//! This module fetches, parses, and caches robots.txt policies. One policy
//! is cached per authority (`host:port`) for the lifetime of a crawl; the
//! same hostname on two ports serves two independent files.
//!
//! Fetch outcomes are deliberately asymmetric: a transport failure or non-2xx
//! response falls back to allow-all, while a redirect that leaves the
//! registrable domain is a policy violation that permanently denies the
//! authority.

mod parser;

pub use parser::RobotsPolicy;

use std::collections::HashMap;
use std::time::Duration;

use url::Url;

use crate::config::CrawlConfig;
use crate::transport::{RequestDescriptor, Transport, TransportEvent};
use crate::url::{authority, host_of, same_registrable_domain};
use crate::{CrawlError, Result};

/// Redirect hops tolerated while resolving a single robots.txt
const MAX_REDIRECT_HOPS: usize = 5;

/// Cached result of a robots.txt fetch for one authority
#[derive(Debug)]
pub enum RobotsOutcome {
    /// A parsed policy, or the allow-all fallback
    Policy(RobotsPolicy),

    /// The fetch redirected off the registrable domain; the authority is
    /// denied for the rest of the crawl
    CrossDomain { host: String, target: String },
}

/// Per-authority robots.txt cache
///
/// `ensure_fetched` resolves the policy for a URL's authority, issuing at
/// most one fetch per authority per crawl. `is_allowed` answers permission
/// checks against whatever is cached. When `respect-robots-txt` is off,
/// nothing is ever fetched and everything is allowed.
#[derive(Debug)]
pub struct RobotsTxtManager {
    enabled: bool,
    user_agent: String,
    timeout: Duration,
    cache: HashMap<String, RobotsOutcome>,
}

impl RobotsTxtManager {
    pub fn new(config: &CrawlConfig) -> Self {
        Self {
            enabled: config.respect_robots_txt,
            user_agent: config.user_agent.clone(),
            timeout: Duration::from_secs(config.request_timeout_secs),
            cache: HashMap::new(),
        }
    }

    /// Resolves the robots.txt policy for `url`'s authority
    ///
    /// On the first reference to an authority this fetches and caches its
    /// robots.txt; later calls hit the cache. Returns the sitemap URLs a
    /// fresh fetch discovered (empty on cache hits and fallbacks) so the
    /// caller can propose each exactly once.
    ///
    /// # Errors
    ///
    /// `CrawlError::RobotsCrossDomain` when the robots.txt fetch redirected
    /// to a different registrable domain, now or on a previous call. The
    /// outcome is cached: the authority is never retried.
    pub async fn ensure_fetched(
        &mut self,
        transport: &dyn Transport,
        url: &Url,
    ) -> Result<Vec<Url>> {
        if !self.enabled {
            return Ok(Vec::new());
        }

        let key = match authority(url) {
            Some(key) => key,
            None => return Ok(Vec::new()),
        };

        if let Some(outcome) = self.cache.get(&key) {
            return match outcome {
                RobotsOutcome::Policy(_) => Ok(Vec::new()),
                RobotsOutcome::CrossDomain { host, target } => {
                    Err(CrawlError::RobotsCrossDomain {
                        host: host.clone(),
                        target: target.clone(),
                    })
                }
            };
        }

        let outcome = self.fetch_policy(transport, url).await;
        let result = match &outcome {
            RobotsOutcome::Policy(policy) => {
                tracing::debug!(
                    "Cached robots.txt policy for {} ({} sitemap URLs)",
                    key,
                    policy.sitemap_urls().len()
                );
                Ok(policy.sitemap_urls().to_vec())
            }
            RobotsOutcome::CrossDomain { host, target } => Err(CrawlError::RobotsCrossDomain {
                host: host.clone(),
                target: target.clone(),
            }),
        };
        self.cache.insert(key, outcome);
        result
    }

    /// Whether the cached policy permits fetching `url`
    ///
    /// Constantly true when `respect-robots-txt` is off. Callers are
    /// expected to have resolved the authority through `ensure_fetched`
    /// first; an authority with no cached outcome is treated as allowed.
    pub fn is_allowed(&self, url: &Url) -> bool {
        if !self.enabled {
            return true;
        }

        let key = match authority(url) {
            Some(key) => key,
            None => return true,
        };

        match self.cache.get(&key) {
            Some(RobotsOutcome::Policy(policy)) => {
                policy.is_allowed(&path_and_query(url), &self.user_agent)
            }
            Some(RobotsOutcome::CrossDomain { .. }) => false,
            None => true,
        }
    }

    /// Fetches and classifies one authority's robots.txt
    ///
    /// Redirects within the registrable domain are followed up to
    /// `MAX_REDIRECT_HOPS`; anything that prevents obtaining a 2xx body
    /// (network error, non-2xx, hop limit exhausted) degrades to the
    /// allow-all fallback rather than blocking the crawl.
    async fn fetch_policy(&self, transport: &dyn Transport, url: &Url) -> RobotsOutcome {
        let origin_host = match host_of(url) {
            Some(host) => host,
            None => return RobotsOutcome::Policy(RobotsPolicy::allow_all()),
        };

        let mut robots_url = match url.join("/robots.txt") {
            Ok(robots_url) => robots_url,
            Err(_) => return RobotsOutcome::Policy(RobotsPolicy::allow_all()),
        };

        for _ in 0..MAX_REDIRECT_HOPS {
            tracing::debug!("Fetching robots.txt from {}", robots_url);

            let mut request = RequestDescriptor::get(robots_url.clone());
            request.set_header("User-Agent", &self.user_agent);
            request.timeout = self.timeout;

            match transport.run(&request).await {
                Ok(TransportEvent::Response { meta, body }) => {
                    if (200..300).contains(&meta.code) {
                        let text = String::from_utf8_lossy(&body);
                        return RobotsOutcome::Policy(RobotsPolicy::from_content(&text));
                    }
                    tracing::debug!(
                        "robots.txt at {} returned status {}, allowing all",
                        robots_url,
                        meta.code
                    );
                    return RobotsOutcome::Policy(RobotsPolicy::allow_all());
                }
                Ok(TransportEvent::Redirect { location, .. }) => {
                    let next = match robots_url.join(&location) {
                        Ok(next) => next,
                        Err(_) => return RobotsOutcome::Policy(RobotsPolicy::allow_all()),
                    };
                    let next_host = match host_of(&next) {
                        Some(host) => host,
                        None => return RobotsOutcome::Policy(RobotsPolicy::allow_all()),
                    };

                    if !same_registrable_domain(&origin_host, &next_host) {
                        tracing::warn!(
                            "robots.txt for {} redirected to a disallowed domain: {}",
                            origin_host,
                            next_host
                        );
                        return RobotsOutcome::CrossDomain {
                            host: origin_host,
                            target: next_host,
                        };
                    }
                    robots_url = next;
                }
                Err(e) => {
                    tracing::debug!(
                        "robots.txt fetch from {} failed ({}), allowing all",
                        robots_url,
                        e
                    );
                    return RobotsOutcome::Policy(RobotsPolicy::allow_all());
                }
            }
        }

        tracing::debug!(
            "robots.txt for {} exceeded {} redirects, allowing all",
            origin_host,
            MAX_REDIRECT_HOPS
        );
        RobotsOutcome::Policy(RobotsPolicy::allow_all())
    }
}

/// The path component robots matching runs against, query included
fn path_and_query(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

//! Cross-host follow policy
//!
//! Hosts compare by name only. Ports belong to the dedup fingerprint and to
//! robots caching, not to the question of whether a link leaves the site.

use crate::config::CrawlConfig;
use crate::url::same_host;

/// Decides whether the crawl may move from one host to another
///
/// Cross-host moves are refused except for one carve-out: while the seed
/// request's own redirect chain is still open and
/// `allow-initial-domain-change` is set, that chain may land anywhere. The
/// caller tracks which evaluations belong to the initial chain.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DomainPolicy {
    allow_initial_domain_change: bool,
}

impl DomainPolicy {
    pub(crate) fn new(config: &CrawlConfig) -> Self {
        Self {
            allow_initial_domain_change: config.allow_initial_domain_change,
        }
    }

    pub(crate) fn may_follow(&self, from_host: &str, to_host: &str, initial_chain: bool) -> bool {
        if same_host(from_host, to_host) {
            return true;
        }
        initial_chain && self.allow_initial_domain_change
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(allow_initial: bool) -> DomainPolicy {
        let config = CrawlConfig {
            allow_initial_domain_change: allow_initial,
            ..CrawlConfig::default()
        };
        DomainPolicy::new(&config)
    }

    #[test]
    fn test_same_host_always_allowed() {
        let policy = policy(false);
        assert!(policy.may_follow("example.com", "example.com", false));
        assert!(policy.may_follow("Example.COM", "example.com", false));
        assert!(policy.may_follow("example.com", "example.com", true));
    }

    #[test]
    fn test_cross_host_refused_by_default() {
        let policy = policy(false);
        assert!(!policy.may_follow("example.com", "other.com", false));
        // Even on the initial chain, the config flag gates the carve-out.
        assert!(!policy.may_follow("example.com", "other.com", true));
    }

    #[test]
    fn test_cross_host_allowed_only_on_initial_chain() {
        let policy = policy(true);
        assert!(policy.may_follow("example.com", "other.com", true));
        assert!(!policy.may_follow("example.com", "other.com", false));
    }

    #[test]
    fn test_subdomains_are_different_hosts() {
        let policy = policy(false);
        assert!(!policy.may_follow("example.com", "www.example.com", false));
    }
}

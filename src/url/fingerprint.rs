use url::Url;

/// Checks whether a URL is something the engine can fetch
///
/// Only absolute `http`/`https` URLs with a host qualify. Everything else
/// (`mailto:`, `javascript:`, `data:`, scheme-less fragments) is skipped
/// during discovery without being treated as an error.
pub fn is_crawlable(url: &Url) -> bool {
    (url.scheme() == "http" || url.scheme() == "https") && url.host_str().is_some()
}

/// Computes the dedup fingerprint for a URL
///
/// The fingerprint is `scheme://host:port/path?query` with the host
/// lowercased and the port made explicit (default ports included), so two
/// spellings of the same resource collapse to one key. The fragment never
/// participates: `/page#a` and `/page#b` are the same resource. Query
/// strings are kept verbatim, order included, because reordered parameters
/// may address different resources.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use kumo::url::fingerprint;
///
/// let a = Url::parse("http://Example.COM/page#top").unwrap();
/// let b = Url::parse("http://example.com:80/page").unwrap();
/// assert_eq!(fingerprint(&a), fingerprint(&b));
/// ```
pub fn fingerprint(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default().to_lowercase();
    let port = url.port_or_known_default().unwrap_or(0);

    match url.query() {
        Some(query) => format!("{}://{}:{}{}?{}", url.scheme(), host, port, url.path(), query),
        None => format!("{}://{}:{}{}", url.scheme(), host, port, url.path()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fp(s: &str) -> String {
        fingerprint(&Url::parse(s).unwrap())
    }

    #[test]
    fn test_host_case_is_normalized() {
        assert_eq!(fp("http://EXAMPLE.com/a"), fp("http://example.com/a"));
    }

    #[test]
    fn test_default_port_is_explicit() {
        assert_eq!(fp("http://example.com/a"), fp("http://example.com:80/a"));
        assert_eq!(fp("https://example.com/a"), fp("https://example.com:443/a"));
    }

    #[test]
    fn test_distinct_ports_are_distinct() {
        assert_ne!(fp("http://example.com/a"), fp("http://example.com:3000/a"));
    }

    #[test]
    fn test_fragment_is_ignored() {
        assert_eq!(fp("http://example.com/a#x"), fp("http://example.com/a#y"));
        assert_eq!(fp("http://example.com/a#x"), fp("http://example.com/a"));
    }

    #[test]
    fn test_query_is_significant_and_order_preserving() {
        assert_ne!(fp("http://example.com/a?x=1"), fp("http://example.com/a"));
        assert_ne!(
            fp("http://example.com/a?x=1&y=2"),
            fp("http://example.com/a?y=2&x=1")
        );
    }

    #[test]
    fn test_path_case_is_significant() {
        assert_ne!(fp("http://example.com/Page"), fp("http://example.com/page"));
    }

    #[test]
    fn test_scheme_is_significant() {
        assert_ne!(fp("http://example.com/"), fp("https://example.com/"));
    }

    #[test]
    fn test_is_crawlable() {
        assert!(is_crawlable(&Url::parse("http://example.com/").unwrap()));
        assert!(is_crawlable(&Url::parse("https://example.com/").unwrap()));
        assert!(!is_crawlable(&Url::parse("mailto:user@example.com").unwrap()));
        assert!(!is_crawlable(&Url::parse("ftp://example.com/file").unwrap()));
        assert!(!is_crawlable(&Url::parse("data:text/plain,hi").unwrap()));
    }
}

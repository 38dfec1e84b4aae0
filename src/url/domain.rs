use std::net::IpAddr;
use url::Url;

/// Two-level public suffixes that take a third label for the registrable
/// domain. Deliberately small: the long tail of the public suffix list does
/// not matter for deciding whether a robots.txt redirect left the site.
const TWO_LEVEL_SUFFIXES: &[&str] = &[
    "co.uk", "org.uk", "ac.uk", "gov.uk", "co.jp", "ne.jp", "or.jp", "com.au", "net.au", "org.au",
    "co.nz", "com.br", "com.cn", "co.in", "co.kr", "com.mx", "co.za", "com.sg", "com.tw",
];

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use kumo::url::host_of;
///
/// let url = Url::parse("https://Blog.Example.COM/post").unwrap();
/// assert_eq!(host_of(&url), Some("blog.example.com".to_string()));
/// ```
pub fn host_of(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Builds the `host:port` authority key for a URL
///
/// Robots.txt policies are cached per authority, not per host: the same
/// hostname on two ports serves two independent robots.txt files.
pub fn authority(url: &Url) -> Option<String> {
    let host = host_of(url)?;
    let port = url.port_or_known_default()?;
    Some(format!("{}:{}", host, port))
}

/// Compares two hosts by name, case-insensitively
///
/// Ports are deliberately not part of the comparison: domain policy treats
/// `example.com:3000` and `example.com:3001` as the same place, while the
/// dedup fingerprint keeps them distinct.
pub fn same_host(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Reduces a host to its registrable domain
///
/// IP literals and single-label hosts (`localhost`) are their own
/// registrable domain. Otherwise the last two labels are taken, or three
/// when the final two form a well-known public suffix like `co.uk`.
///
/// # Examples
///
/// ```
/// use kumo::url::registrable_domain;
///
/// assert_eq!(registrable_domain("www.example.com"), "example.com");
/// assert_eq!(registrable_domain("deep.sub.example.co.uk"), "example.co.uk");
/// assert_eq!(registrable_domain("localhost"), "localhost");
/// assert_eq!(registrable_domain("127.0.0.1"), "127.0.0.1");
/// ```
pub fn registrable_domain(host: &str) -> String {
    let host = host.to_lowercase();

    if host.parse::<IpAddr>().is_ok() {
        return host;
    }

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() <= 2 {
        return host;
    }

    let last_two = labels[labels.len() - 2..].join(".");
    if TWO_LEVEL_SUFFIXES.contains(&last_two.as_str()) {
        labels[labels.len() - 3..].join(".")
    } else {
        last_two
    }
}

/// Whether two hosts belong to the same registrable domain
pub fn same_registrable_domain(a: &str, b: &str) -> bool {
    registrable_domain(a) == registrable_domain(b)
}

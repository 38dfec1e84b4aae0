use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::url::same_host;
use crate::CookieError;

/// Host value for cookies added without any host context; matches every host.
pub const ANY_HOST: &str = "*";

/// One stored cookie
#[derive(Debug, Clone, PartialEq)]
pub struct Cookie {
    pub name: String,
    pub value: String,

    /// Host the cookie belongs to, or [`ANY_HOST`]
    pub host: String,

    /// True when the cookie came without a `Domain` attribute and therefore
    /// matches its host exactly rather than by domain suffix
    pub host_only: bool,

    pub path: String,

    /// Absolute expiry, from `Expires` or `Max-Age`; `None` means a session
    /// cookie that never expires within one crawl
    pub expires: Option<DateTime<Utc>>,
}

impl Cookie {
    /// Parses a single `Set-Cookie` line
    ///
    /// The first `name=value` pair is required: a line without `=` in its
    /// first pair, or with an empty name, is malformed. Recognized
    /// attributes are `Path`, `Domain`, `Expires` and `Max-Age`
    /// (case-insensitive); `Max-Age` wins over `Expires` when both appear.
    /// Unknown attributes (`Secure`, `HttpOnly`, `SameSite`, ...) are
    /// ignored.
    ///
    /// `default_host` is used when no `Domain` attribute is present.
    pub fn parse(line: &str, default_host: &str) -> Result<Self, CookieError> {
        let mut parts = line.split(';');

        let first = parts.next().unwrap_or_default().trim();
        let (name, value) = match first.split_once('=') {
            Some((name, value)) => (name.trim(), value.trim()),
            None => return Err(CookieError::Malformed(line.to_string())),
        };
        if name.is_empty() {
            return Err(CookieError::EmptyName(line.to_string()));
        }

        let mut cookie = Cookie {
            name: name.to_string(),
            value: value.to_string(),
            host: default_host.to_lowercase(),
            host_only: true,
            path: "/".to_string(),
            expires: None,
        };

        let mut max_age: Option<i64> = None;
        for attr in parts {
            let attr = attr.trim();
            let (key, val) = match attr.split_once('=') {
                Some((k, v)) => (k.trim(), v.trim()),
                None => continue,
            };

            match key.to_ascii_lowercase().as_str() {
                "path" if !val.is_empty() => cookie.path = val.to_string(),
                "domain" if !val.is_empty() => {
                    cookie.host = val.trim_start_matches('.').to_lowercase();
                    cookie.host_only = false;
                }
                "expires" => cookie.expires = parse_cookie_date(val),
                "max-age" => max_age = val.parse().ok(),
                _ => {}
            }
        }

        if let Some(seconds) = max_age {
            cookie.expires = Some(Utc::now() + chrono::Duration::seconds(seconds));
        }

        Ok(cookie)
    }

    /// Whether this cookie applies to requests for `host`
    pub fn matches_host(&self, host: &str) -> bool {
        if self.host == ANY_HOST {
            return true;
        }
        if same_host(&self.host, host) {
            return true;
        }
        if self.host_only {
            return false;
        }
        // Domain cookie: any subdomain of the cookie's host matches
        host.to_lowercase()
            .ends_with(&format!(".{}", self.host))
    }

    /// Whether this cookie has expired as of `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires, Some(at) if at <= now)
    }

    /// Serializes as the `name=value` request-header pair
    pub fn to_pair(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

/// Parses the date formats servers actually put in `Expires`
///
/// Tries RFC 2822 first (`Wed, 21 Oct 2015 07:28:00 GMT`), then the old
/// dashed Netscape form (`Wed, 21-Oct-2015 07:28:00 GMT`). Returns `None`
/// for anything else; an unparseable expiry degrades the cookie to a
/// session cookie rather than failing the whole line.
fn parse_cookie_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc2822(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, "%a, %d-%b-%Y %H:%M:%S GMT")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

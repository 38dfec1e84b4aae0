use chrono::Utc;

use crate::cookies::cookie::{Cookie, ANY_HOST};
use crate::CookieError;

/// Per-host cookie store
///
/// Cookies keep their insertion order, and re-setting a cookie (same host,
/// name, and path) overwrites the value in place, so the serialized header
/// is stable: `name1=value1; name2=value2; name3=value3`.
#[derive(Debug, Default)]
pub struct CookieJar {
    cookies: Vec<Cookie>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one `Set-Cookie` line received from `host`
    ///
    /// A malformed line is reported and dropped; it never poisons cookies
    /// that were already stored.
    pub fn add_line(&mut self, host: &str, line: &str) -> Result<(), CookieError> {
        let cookie = Cookie::parse(line, host)?;
        self.upsert(cookie);
        Ok(())
    }

    /// Adds cookie lines that arrived outside any response context
    ///
    /// Such cookies match every host. All well-formed lines are applied
    /// even when some line is malformed; the first error is returned.
    pub fn add_from_headers<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<(), CookieError> {
        let mut first_error = None;
        for line in lines {
            if let Err(e) = self.add_line(ANY_HOST, line.as_ref()) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Adds `Set-Cookie` lines from a response, keyed to the responding host
    pub fn add_from_response<S: AsRef<str>>(
        &mut self,
        host: &str,
        lines: &[S],
    ) -> Result<(), CookieError> {
        let mut first_error = None;
        for line in lines {
            if let Err(e) = self.add_line(host, line.as_ref()) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Builds the `Cookie` request header value for a host
    ///
    /// Returns `None` when no live cookie applies. Expired cookies are
    /// skipped, not deleted; re-setting them revives the slot in place.
    pub fn header_for(&self, host: &str) -> Option<String> {
        let now = Utc::now();
        let pairs: Vec<String> = self
            .cookies
            .iter()
            .filter(|c| c.matches_host(host) && !c.is_expired(now))
            .map(Cookie::to_pair)
            .collect();

        if pairs.is_empty() {
            None
        } else {
            Some(pairs.join("; "))
        }
    }

    /// Number of stored cookies, expired ones included
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Overwrites in place on (host, name, path); appends otherwise
    fn upsert(&mut self, cookie: Cookie) {
        tracing::trace!("Storing cookie {} for {}", cookie.name, cookie.host);
        if let Some(existing) = self.cookies.iter_mut().find(|c| {
            c.host == cookie.host && c.name == cookie.name && c.path == cookie.path
        }) {
            *existing = cookie;
        } else {
            self.cookies.push(cookie);
        }
    }
}

//! Cookie handling for kumo
//!
//! The engine keeps one [`CookieJar`] per crawl session: `Set-Cookie`
//! response headers are merged in as fetches complete, and every outgoing
//! request gets the jar's serialized `Cookie` header for its host. A
//! malformed cookie line surfaces a `cookieerror` event but never aborts
//! the crawl.

mod cookie;
mod jar;

pub use cookie::{Cookie, ANY_HOST};
pub use jar::CookieJar;

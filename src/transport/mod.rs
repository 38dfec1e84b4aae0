//! Transport capability for kumo
//!
//! The engine never talks to the network directly: it hands a
//! [`RequestDescriptor`] to a [`Transport`] and gets back one of two
//! outcomes, a full response or a redirect, or a [`TransportError`]. The
//! bundled [`HttpTransport`] implements the trait over reqwest; tests
//! substitute scripted transports to exercise the pipeline
//! deterministically.

mod http;

pub use http::HttpTransport;

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

pub use crate::TransportError;

/// A request the engine is about to issue
///
/// Listeners observing `fetchstart` receive the descriptor mutably and may
/// adjust headers before the transport sees it. Header order is preserved
/// into the outgoing request.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub url: Url,
    pub method: String,
    pub headers: Vec<(String, String)>,

    /// Reject bodies larger than this many bytes, aborting mid-read
    pub body_limit: Option<usize>,

    pub timeout: Duration,
}

impl RequestDescriptor {
    /// A plain GET with no headers and a 30 second timeout
    pub fn get(url: Url) -> Self {
        Self {
            url,
            method: "GET".to_string(),
            headers: Vec::new(),
            body_limit: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// First value of a header, case-insensitive
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Replaces a header in place, or appends it
    pub fn set_header(&mut self, name: &str, value: &str) {
        if let Some(slot) = self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            slot.1 = value.to_string();
        } else {
            self.headers.push((name.to_string(), value.to_string()));
        }
    }
}

/// Response metadata the engine cares about
#[derive(Debug, Clone, Default)]
pub struct ResponseMeta {
    pub code: u16,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,

    /// Every `Set-Cookie` header on the response, in arrival order
    pub set_cookie: Vec<String>,
}

/// What came back from the wire
#[derive(Debug)]
pub enum TransportEvent {
    /// A non-redirect response with its full body
    Response { meta: ResponseMeta, body: Vec<u8> },

    /// A 3xx response; `location` is the raw header value, possibly relative
    Redirect { code: u16, location: String },
}

/// The capability interface between the engine and the network
#[async_trait]
pub trait Transport: Send + Sync {
    async fn run(&self, request: &RequestDescriptor) -> Result<TransportEvent, TransportError>;
}

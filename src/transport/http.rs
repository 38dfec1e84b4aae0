use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, LOCATION, SET_COOKIE};
use reqwest::{redirect::Policy, Client, Method};
use std::time::Duration;

use crate::transport::{RequestDescriptor, ResponseMeta, Transport, TransportEvent};
use crate::TransportError;

/// The bundled reqwest-backed transport
///
/// Redirects are never followed here: the engine owns redirect semantics
/// (domain policy, depth inheritance), so a 3xx comes back as
/// [`TransportEvent::Redirect`] untouched. The body-size ceiling is
/// enforced while streaming, so an oversized body is abandoned mid-read
/// rather than buffered whole.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds the transport with kumo's client settings
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::none())
            .gzip(true)
            .brotli(true)
            .build()?;
        Ok(Self { client })
    }

    /// Wraps an externally configured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn run(&self, request: &RequestDescriptor) -> Result<TransportEvent, TransportError> {
        let url = request.url.to_string();
        let method = Method::from_bytes(request.method.as_bytes()).unwrap_or(Method::GET);

        let mut builder = self
            .client
            .request(method, request.url.clone())
            .timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let mut response = builder.send().await.map_err(|e| classify(e, &url))?;
        let status = response.status();
        tracing::trace!("Received {} from {}", status.as_u16(), url);

        if status.is_redirection() {
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
                .ok_or(TransportError::MissingLocation { url })?;
            return Ok(TransportEvent::Redirect {
                code: status.as_u16(),
                location,
            });
        }

        let meta = ResponseMeta {
            code: status.as_u16(),
            content_type: response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            content_length: response.content_length(),
            set_cookie: response
                .headers()
                .get_all(SET_COOKIE)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .map(str::to_string)
                .collect(),
        };

        // Refuse on the declared length before reading anything
        if let (Some(limit), Some(declared)) = (request.body_limit, meta.content_length) {
            if declared > limit as u64 {
                return Err(TransportError::BodyTooLarge { url, limit });
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| classify(e, &url))? {
            if let Some(limit) = request.body_limit {
                if body.len() + chunk.len() > limit {
                    return Err(TransportError::BodyTooLarge { url, limit });
                }
            }
            body.extend_from_slice(&chunk);
        }

        Ok(TransportEvent::Response { meta, body })
    }
}

fn classify(error: reqwest::Error, url: &str) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        TransportError::Connection {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else {
        TransportError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

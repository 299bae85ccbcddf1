//! HTTP transport.
//!
//! The API is plain GET requests with everything in the query string. A
//! response is any delivered body, whatever the HTTP status: the server
//! signals failures inside the XML envelope, which the protocol parser
//! classifies.

use crate::Result;
use std::collections::VecDeque;
use std::time::Duration;
use tracing::debug;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with every request.
const USER_AGENT: &str = concat!("karotz-rs/", env!("CARGO_PKG_VERSION"));

/// Something that can perform a blocking GET and hand back the body.
pub trait Transport {
    /// Fetch `url` and return the response body.
    fn get(&mut self, url: &str) -> Result<Vec<u8>>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn get(&mut self, url: &str) -> Result<Vec<u8>> {
        (**self).get(url)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn get(&mut self, url: &str) -> Result<Vec<u8>> {
        (**self).get(url)
    }
}

/// Blocking HTTP transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Create a transport with the default timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a transport with a specific request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&mut self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        let body = response.bytes()?;

        if !status.is_success() {
            debug!("HTTP {} from {} ({} bytes)", status, redact_signature(url), body.len());
        }

        Ok(body.to_vec())
    }
}

/// In-memory transport that records requested URLs and replays canned bodies.
///
/// Useful for tests and for exercising the client without a device.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    responses: VecDeque<Vec<u8>>,
    requests: Vec<String>,
}

impl MockTransport {
    /// Create a transport with no queued responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response body. Bodies are returned in the order queued.
    pub fn push_response(&mut self, body: impl Into<Vec<u8>>) -> &mut Self {
        self.responses.push_back(body.into());
        self
    }

    /// Builder-style [`push_response`](Self::push_response).
    pub fn with_response(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.push_response(body);
        self
    }

    /// URLs requested so far, oldest first.
    pub fn requests(&self) -> &[String] {
        &self.requests
    }

    /// The most recent URL requested.
    pub fn last_request(&self) -> Option<&str> {
        self.requests.last().map(String::as_str)
    }

    /// Number of queued responses not yet consumed.
    pub fn pending_responses(&self) -> usize {
        self.responses.len()
    }
}

impl Transport for MockTransport {
    /// Returns an empty body once the queue is exhausted, which the parser
    /// reports as a malformed response.
    fn get(&mut self, url: &str) -> Result<Vec<u8>> {
        self.requests.push(url.to_string());
        Ok(self.responses.pop_front().unwrap_or_default())
    }
}

/// Replace the value of a `signature` query parameter for logging.
pub(crate) fn redact_signature(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };
    let query: Vec<&str> = query
        .split('&')
        .map(|pair| if pair.starts_with("signature=") { "signature=<redacted>" } else { pair })
        .collect();
    format!("{}?{}", base, query.join("&"))
}

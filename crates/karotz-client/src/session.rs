//! Interactive session management.
//!
//! A [`Karotz`] is either inactive (no interactive id) or active. `start`
//! opens a session with a signed call; every other call is unsigned and
//! carries the interactive id.
//!
//! `stop` forgets the interactive id before it even sends the request, so a
//! failed stop never leaves a dead id behind. Any transport or parser error is
//! still returned to the caller. Dropping an active client stops the session.

use crate::credentials::Credentials;
use crate::transport::{redact_signature, HttpTransport, Transport};
use crate::{ClientError, Result};
use karotz_protocol::{parse_message, parse_start, Function, Params, RequestBuilder, VooMessage};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tracing::{debug, info, warn};

/// Smallest value of the one-time `once` nonce sent with `start`.
pub const NONCE_MIN: u64 = 100_000_000;

/// Largest value of the one-time `once` nonce sent with `start`.
pub const NONCE_MAX: u64 = 99_999_999_999;

/// Parameter carrying the session id on session-scoped calls.
pub const INTERACTIVE_ID_KEY: &str = "interactiveid";

/// Client for one Karotz application install.
pub struct Karotz<T: Transport = HttpTransport> {
    credentials: Credentials,
    transport: T,
    requests: RequestBuilder,
    rng: Box<dyn RngCore + Send>,
    /// Interactive session id, present while active.
    interactive_id: Option<String>,
    /// Functions granted by the last `start`.
    access: Vec<String>,
}

impl<T: Transport> std::fmt::Debug for Karotz<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Karotz")
            .field("credentials", &self.credentials)
            .field("base_url", &self.requests.base_url())
            .field("interactive_id", &self.interactive_id)
            .field("access", &self.access)
            .finish()
    }
}

impl Karotz<HttpTransport> {
    /// Connect over HTTP with credentials from the default settings file.
    pub fn from_default_settings() -> Result<Self> {
        Self::connect(Credentials::load_default()?, HttpTransport::new()?)
    }
}

impl<T: Transport> Karotz<T> {
    /// Create an inactive client.
    pub fn new(credentials: Credentials, transport: T) -> Self {
        Karotz {
            credentials,
            transport,
            requests: RequestBuilder::default(),
            rng: Box::new(StdRng::from_entropy()),
            interactive_id: None,
            access: Vec::new(),
        }
    }

    /// Create a client and start a session right away.
    pub fn connect(credentials: Credentials, transport: T) -> Result<Self> {
        let mut karotz = Self::new(credentials, transport);
        karotz.start()?;
        Ok(karotz)
    }

    /// Use a different API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.requests = RequestBuilder::new(base_url);
        self
    }

    /// Use a specific random source for `start` nonces.
    pub fn with_rng<R: RngCore + Send + 'static>(mut self, rng: R) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// The credentials this client signs with.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The request builder (and thus base URL) in use.
    pub fn request_builder(&self) -> &RequestBuilder {
        &self.requests
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the underlying transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Whether an interactive session is open.
    pub fn is_active(&self) -> bool {
        self.interactive_id.is_some()
    }

    /// The interactive session id, while active.
    pub fn interactive_id(&self) -> Option<&str> {
        self.interactive_id.as_deref()
    }

    /// Functions the application was granted by the last `start`.
    pub fn access(&self) -> &[String] {
        &self.access
    }

    /// Whether the current session grants access to `function`.
    pub fn has_access(&self, function: &str) -> bool {
        self.is_active() && self.access.iter().any(|a| a == function)
    }

    /// Open an interactive session.
    ///
    /// A session that is already open is stopped first. On failure the client
    /// stays inactive.
    pub fn start(&mut self) -> Result<()> {
        if self.is_active() {
            self.stop_logged("start");
        }

        let params = Params::new()
            .with("apikey", self.credentials.apikey())
            .with("installid", self.credentials.installid())
            .with("once", self.next_nonce())
            .with("timestamp", chrono::Utc::now().timestamp());

        let url = self
            .requests
            .build_signed(Function::Start.as_str(), &params, self.credentials.secret());
        let body = self.fetch(&url)?;
        let grant = parse_start(&body)?;

        info!(
            "Karotz: interactive session {} started (access: {})",
            grant.interactive_id,
            grant.access.join(",")
        );

        self.interactive_id = Some(grant.interactive_id);
        self.access = grant.access;
        Ok(())
    }

    /// Close the interactive session.
    ///
    /// The session is forgotten whatever the server answers; errors are
    /// still returned. Fails with [`ClientError::NotConnected`] when inactive.
    pub fn stop(&mut self) -> Result<()> {
        let interactive_id = self.interactive_id.take().ok_or(ClientError::NotConnected)?;
        self.access.clear();

        let params = Params::new()
            .with("action", "stop")
            .with(INTERACTIVE_ID_KEY, &interactive_id);
        let url = self.requests.build(Function::InteractiveMode.as_str(), &params, None);
        let body = self.fetch(&url)?;
        parse_message(&body)?;

        info!("Karotz: interactive session {} stopped", interactive_id);
        Ok(())
    }

    /// Stop (if active), then start.
    ///
    /// A failing stop does not prevent the start; it is logged and only the
    /// start outcome is returned.
    pub fn restart(&mut self) -> Result<()> {
        if self.is_active() {
            self.stop_logged("restart");
        }
        self.start()
    }

    /// Stop the session and consume the client, returning the stop outcome.
    pub fn close(mut self) -> Result<()> {
        if self.is_active() {
            self.stop()
        } else {
            Ok(())
        }
    }

    /// Issue a session-scoped call.
    ///
    /// `interactiveid` is added to `params`. Fails with
    /// [`ClientError::NotConnected`] without touching the network when no
    /// session is open.
    pub fn call(&mut self, function: Function, mut params: Params) -> Result<VooMessage> {
        let interactive_id = self.interactive_id.as_deref().ok_or(ClientError::NotConnected)?;
        params.insert(INTERACTIVE_ID_KEY, interactive_id);

        let url = self.requests.build(function.as_str(), &params, None);
        let body = self.fetch(&url)?;
        let message = parse_message(&body)?;
        debug!("Karotz: {} acknowledged (id={:?})", function, message.id);
        Ok(message)
    }

    fn fetch(&mut self, url: &str) -> Result<Vec<u8>> {
        debug!("Karotz: GET {}", redact_signature(url));
        let body = self.transport.get(url)?;
        debug!("Karotz: response {}", String::from_utf8_lossy(&body).trim());
        Ok(body)
    }

    fn stop_logged(&mut self, context: &str) {
        if let Err(e) = self.stop() {
            warn!("Karotz: stopping session before {} failed: {}", context, e);
        }
    }

    fn next_nonce(&mut self) -> u64 {
        self.rng.gen_range(NONCE_MIN..=NONCE_MAX)
    }
}

impl<T: Transport> Drop for Karotz<T> {
    fn drop(&mut self) {
        if self.is_active() {
            self.stop_logged("drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;
    use rand_chacha::ChaCha8Rng;

    const START_RESPONSE: &str = "<VoosMsg><interactiveMode><interactiveId>abc-123</interactiveId>\
        <access>led</access><access>ears</access></interactiveMode></VoosMsg>";
    const OK_RESPONSE: &str =
        "<VoosMsg><id>1</id><interactiveId>abc-123</interactiveId><response><code>OK</code></response></VoosMsg>";
    const ERROR_RESPONSE: &str = "<VoosMsg><response><code>ERROR</code></response></VoosMsg>";

    fn credentials() -> Credentials {
        Credentials::new("AK", "S3", "IID").unwrap()
    }

    #[test]
    fn test_new_is_inactive() {
        let mut transport = MockTransport::new();
        let karotz = Karotz::new(credentials(), &mut transport);
        assert!(!karotz.is_active());
        assert_eq!(karotz.interactive_id(), None);
        assert!(karotz.access().is_empty());
        drop(karotz);
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_nonce_in_range() {
        let mut transport = MockTransport::new();
        let mut karotz = Karotz::new(credentials(), &mut transport).with_rng(ChaCha8Rng::seed_from_u64(7));
        for _ in 0..1000 {
            let nonce = karotz.next_nonce();
            assert!((NONCE_MIN..=NONCE_MAX).contains(&nonce));
        }
    }

    #[test]
    fn test_nonce_seeded_is_reproducible() {
        let mut a = MockTransport::new();
        let mut b = MockTransport::new();
        let mut first = Karotz::new(credentials(), &mut a).with_rng(ChaCha8Rng::seed_from_u64(42));
        let mut second = Karotz::new(credentials(), &mut b).with_rng(ChaCha8Rng::seed_from_u64(42));
        assert_eq!(first.next_nonce(), second.next_nonce());
    }

    #[test]
    fn test_start_then_stop() {
        let mut transport = MockTransport::new().with_response(START_RESPONSE).with_response(OK_RESPONSE);
        let mut karotz = Karotz::new(credentials(), &mut transport);

        karotz.start().unwrap();
        assert_eq!(karotz.interactive_id(), Some("abc-123"));
        assert!(karotz.has_access("led"));
        assert!(!karotz.has_access("tts"));

        karotz.stop().unwrap();
        assert!(!karotz.is_active());
        assert!(!karotz.has_access("led"));
        drop(karotz);

        assert_eq!(transport.requests().len(), 2);
        assert_eq!(
            transport.requests()[1],
            "http://api.karotz.com/api/karotz/interactivemode?action=stop&interactiveid=abc-123"
        );
    }

    #[test]
    fn test_stop_when_inactive() {
        let mut transport = MockTransport::new();
        let mut karotz = Karotz::new(credentials(), &mut transport);
        assert!(matches!(karotz.stop(), Err(ClientError::NotConnected)));
        drop(karotz);
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_start_failure_stays_inactive() {
        let mut transport = MockTransport::new().with_response(ERROR_RESPONSE);
        let mut karotz = Karotz::new(credentials(), &mut transport);
        let err = karotz.start().unwrap_err();
        assert_eq!(err.raw_response(), Some(ERROR_RESPONSE));
        assert!(!karotz.is_active());
    }

    #[test]
    fn test_custom_base_url() {
        let mut transport = MockTransport::new().with_response(START_RESPONSE).with_response(OK_RESPONSE);
        // The start goes to the default base; the stop on drop uses the new one.
        let karotz = Karotz::connect(credentials(), &mut transport)
            .unwrap()
            .with_base_url("http://localhost:9999/api");
        assert_eq!(karotz.request_builder().base_url(), "http://localhost:9999/api/");
        drop(karotz);
        assert!(transport.requests()[1].starts_with("http://localhost:9999/api/interactivemode?"));
    }
}

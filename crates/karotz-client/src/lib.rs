//! # karotz-client
//!
//! Blocking client for the Karotz REST API.
//!
//! This crate adds I/O and session state on top of `karotz-protocol`:
//! - [`Credentials`] - validated API key, secret and install id, loaded from a
//!   YAML settings file or the environment
//! - [`Karotz`] - the interactive session: `start`, `stop`, `restart`, `call`
//!   and the device actions (ears, LED, speech)
//! - [`Transport`] - the HTTP seam, with a `reqwest` implementation and an
//!   in-memory [`MockTransport`]
//!
//! ## Session Lifecycle
//!
//! A session is opened with `start` and closed with `stop`, `close`, or by
//! dropping the client. `stop` always forgets the session id, even when the
//! server rejects the request, and reports the failure to the caller.
//!
//! ## Example
//!
//! ```no_run
//! use karotz_client::{Color, Credentials, HttpTransport, Karotz, Language};
//!
//! let credentials = Credentials::load_default()?;
//! let mut karotz = Karotz::connect(credentials, HttpTransport::new()?)?;
//!
//! karotz.led_light(&Color::GREEN)?;
//! karotz.say("Hello from Rust", Language::English)?;
//! karotz.spin_clockwise()?;
//!
//! // Stops the interactive session; dropping `karotz` would do the same.
//! karotz.close()?;
//! # Ok::<(), karotz_client::ClientError>(())
//! ```

mod actions;
mod credentials;
mod error;
mod session;
mod transport;

pub use actions::{
    Color, Language, LedAction, TtsAction, DEFAULT_FADE_PERIOD_MS, DEFAULT_PULSE_DURATION_MS,
    DEFAULT_PULSE_PERIOD_MS,
};
pub use credentials::{
    Credentials, DEFAULT_FILE_NAME, DEFAULT_SECTION, ENV_APIKEY, ENV_INSTALLID, ENV_SECRET,
};
pub use error::ClientError;
pub use session::{Karotz, INTERACTIVE_ID_KEY, NONCE_MAX, NONCE_MIN};
pub use transport::{HttpTransport, MockTransport, Transport, DEFAULT_TIMEOUT};

pub use karotz_protocol as protocol;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

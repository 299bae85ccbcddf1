//! Karotz REST protocol
//!
//! This crate provides the pure, I/O-free part of talking to the Karotz API:
//! building request URLs, signing the session-opening call and classifying
//! the XML documents the server answers with.
//!
//! # Protocol Overview
//!
//! Every call is an HTTP GET to `http://api.karotz.com/api/karotz/<function>`
//! with all parameters in the query string:
//!
//! - **`start`** opens an interactive session. It carries `apikey`,
//!   `installid`, a one-time `once` nonce and a `timestamp`, and is signed:
//!   the sorted query string is run through HMAC-SHA1 with the application
//!   secret and the base64 digest is appended as `signature`.
//! - **Session-scoped functions** (`ears`, `led`, `tts`, `interactivemode`)
//!   are unsigned and carry the `interactiveid` returned by `start`.
//!
//! Parameters are always serialized sorted by key, so the query the server
//! sees is exactly the one that was signed.
//!
//! # Example
//!
//! ```
//! use karotz_protocol::{parse_message, Function, Params, RequestBuilder};
//!
//! let params = Params::new()
//!     .with("action", "light")
//!     .with("color", "FF0000")
//!     .with("interactiveid", "abc-123");
//! let url = RequestBuilder::default().build(Function::Led.as_str(), &params, None);
//! assert!(url.ends_with("led?action=light&color=FF0000&interactiveid=abc-123"));
//!
//! let ack = parse_message("<VoosMsg><id>1</id><response><code>OK</code></response></VoosMsg>")?;
//! assert_eq!(ack.id.as_deref(), Some("1"));
//! # Ok::<(), karotz_protocol::ResponseError>(())
//! ```

mod error;
mod function;
mod params;
mod request;
mod response;
mod signer;

pub use error::*;
pub use function::*;
pub use params::*;
pub use request::*;
pub use response::*;
pub use signer::*;

//! Error types for the client crate.

use karotz_protocol::ResponseError;
use thiserror::Error;

/// Errors that can occur when talking to a Karotz.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server response was empty, malformed, an error or unrecognized.
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// A session-scoped call was attempted without an interactive session.
    #[error("not connected: no interactive session is active")]
    NotConnected,

    /// A credential is missing, empty or the credential source is incomplete.
    #[error("missing credentials: {0}")]
    MissingCredentials(String),

    /// I/O error reading the settings file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file is not valid YAML.
    #[error("invalid settings file: {0}")]
    Config(#[from] serde_yaml::Error),

    /// HTTP transport failure (connection refused, timeout, ...).
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// A LED color that is not six hexadecimal digits.
    #[error("invalid color {0:?} (expected 6 hex digits, e.g. FF0000)")]
    InvalidColor(String),
}

impl ClientError {
    /// The raw server response behind this error, if there was one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            ClientError::Response(e) => Some(e.raw()),
            _ => None,
        }
    }
}

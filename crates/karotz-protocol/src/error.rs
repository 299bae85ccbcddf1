//! Error types for the Karotz protocol.

use thiserror::Error;

/// Errors raised while classifying a response document.
///
/// Every variant keeps the offending document text (when there was one) so
/// callers can log exactly what the server sent back.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResponseError {
    /// The server returned no data, or data that is not well-formed XML.
    #[error("malformed response ({reason}): {raw:?}")]
    MalformedResponse {
        /// What made the document unusable.
        reason: String,
        /// The document as received (lossily decoded if it was not UTF-8).
        raw: String,
    },

    /// The server explicitly reported a failure status.
    #[error("server returned status {code}, the full message was:\n{raw}")]
    ProtocolError {
        /// The status code found in the envelope.
        code: String,
        /// The document as received.
        raw: String,
    },

    /// The envelope carries a status outside the known enumeration, or none.
    #[error("unrecognized response:\n{raw}")]
    UnrecognizedResponse {
        /// The document as received.
        raw: String,
    },
}

impl ResponseError {
    /// The raw response text that caused this error.
    pub fn raw(&self) -> &str {
        match self {
            ResponseError::MalformedResponse { raw, .. } => raw,
            ResponseError::ProtocolError { raw, .. } => raw,
            ResponseError::UnrecognizedResponse { raw } => raw,
        }
    }
}

/// Result type alias for response parsing.
pub type ResponseResult<T> = Result<T, ResponseError>;

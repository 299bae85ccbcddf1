//! Response envelope parsing.
//!
//! Every API call answers with a `VoosMsg` XML document. Two shapes exist:
//!
//! - the reply to `start`, carrying an `interactiveMode` block with the
//!   session id and the list of functions the application may use;
//! - the generic reply, carrying `id`, `correlationId`, `interactiveId` and a
//!   `response/code` status.
//!
//! ```text
//! <VoosMsg>
//!   <id>...</id>
//!   <correlationId>...</correlationId>
//!   <interactiveId>...</interactiveId>
//!   <response><code>OK</code></response>
//! </VoosMsg>
//! ```
//!
//! Tag names and status literals are case-sensitive. Unknown elements are
//! ignored.

use crate::error::{ResponseError, ResponseResult};
use roxmltree::{Document, Node};

/// Status code of a successful call.
pub const STATUS_OK: &str = "OK";

/// Status code of a call the server rejected.
pub const STATUS_ERROR: &str = "ERROR";

/// Session granted by a successful `start` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionGrant {
    /// Opaque interactive session id.
    pub interactive_id: String,
    /// Function names the application has access to.
    pub access: Vec<String>,
}

/// A generic `VoosMsg` acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VooMessage {
    /// Status code (always `OK` once parsed successfully).
    pub code: String,
    /// Message id.
    pub id: Option<String>,
    /// Correlation id.
    pub correlation_id: Option<String>,
    /// Echo of the interactive session id.
    pub interactive_id: Option<String>,
}

/// Either response shape, for callers that do not know which to expect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    /// Reply to a `start` call.
    SessionStarted(SessionGrant),
    /// Generic acknowledgement.
    Generic(VooMessage),
}

impl Envelope {
    /// Parse a document, picking the shape from its content.
    pub fn parse(document: impl AsRef<[u8]>) -> ResponseResult<Envelope> {
        let text = decode(document.as_ref())?;
        let doc = parse_xml(text)?;
        let root = doc.root_element();
        if child(root, "interactiveMode").is_some() {
            session_grant(root, text).map(Envelope::SessionStarted)
        } else {
            voo_message(root, text).map(Envelope::Generic)
        }
    }
}

/// Parse the reply to a `start` call.
pub fn parse_start(document: impl AsRef<[u8]>) -> ResponseResult<SessionGrant> {
    let text = decode(document.as_ref())?;
    let doc = parse_xml(text)?;
    let root = doc.root_element();

    if child(root, "interactiveMode").is_some() {
        return session_grant(root, text);
    }

    // No session block, so something went wrong. Look at the status.
    match status_code(root) {
        Some(STATUS_ERROR) => Err(ResponseError::ProtocolError {
            code: STATUS_ERROR.to_string(),
            raw: text.to_string(),
        }),
        _ => Err(ResponseError::UnrecognizedResponse { raw: text.to_string() }),
    }
}

/// Parse a generic acknowledgement, requiring status `OK`.
pub fn parse_message(document: impl AsRef<[u8]>) -> ResponseResult<VooMessage> {
    let text = decode(document.as_ref())?;
    let doc = parse_xml(text)?;
    voo_message(doc.root_element(), text)
}

fn decode(bytes: &[u8]) -> ResponseResult<&str> {
    let text = std::str::from_utf8(bytes).map_err(|e| ResponseError::MalformedResponse {
        reason: format!("invalid UTF-8: {}", e),
        raw: String::from_utf8_lossy(bytes).into_owned(),
    })?;
    if text.trim().is_empty() {
        return Err(ResponseError::MalformedResponse {
            reason: "empty response".to_string(),
            raw: text.to_string(),
        });
    }
    Ok(text)
}

fn parse_xml(text: &str) -> ResponseResult<Document<'_>> {
    Document::parse(text).map_err(|e| ResponseError::MalformedResponse {
        reason: e.to_string(),
        raw: text.to_string(),
    })
}

fn session_grant(root: Node<'_, '_>, raw: &str) -> ResponseResult<SessionGrant> {
    let Some(block) = child(root, "interactiveMode") else {
        return Err(ResponseError::UnrecognizedResponse { raw: raw.to_string() });
    };

    let interactive_id = child_text(block, "interactiveId")
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ResponseError::MalformedResponse {
            reason: "interactiveMode without interactiveId".to_string(),
            raw: raw.to_string(),
        })?;

    let access = block
        .children()
        .filter(|n| n.has_tag_name("access"))
        .filter_map(|n| n.text())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    Ok(SessionGrant { interactive_id, access })
}

fn voo_message(root: Node<'_, '_>, raw: &str) -> ResponseResult<VooMessage> {
    match status_code(root) {
        Some(STATUS_OK) => Ok(VooMessage {
            code: STATUS_OK.to_string(),
            id: child_text(root, "id"),
            correlation_id: child_text(root, "correlationId"),
            interactive_id: child_text(root, "interactiveId"),
        }),
        Some(code) => Err(ResponseError::ProtocolError {
            code: code.to_string(),
            raw: raw.to_string(),
        }),
        None => Err(ResponseError::UnrecognizedResponse { raw: raw.to_string() }),
    }
}

/// The `response/code` text under `root`.
fn status_code<'a>(root: Node<'a, '_>) -> Option<&'a str> {
    child(root, "response")
        .and_then(|response| child(response, "code"))
        .and_then(|code| code.text())
        .map(str::trim)
}

/// First direct child element named `tag`.
fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.is_element() && n.has_tag_name(tag))
}

fn child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    child(node, tag)
        .and_then(|n| n.text())
        .map(|t| t.trim().to_string())
}

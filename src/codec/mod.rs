//! Relay payload codec.
//!
//! # Data Flow
//! ```text
//! CapturedRequest
//!     → encoder.rs (percent-encode each field, render header blob)
//!     → EncodedPayload "/?dieuri=…&diemet=…&diehed=…&diecok=…&diebod=…"
//!
//! Worker side / tooling:
//!     EncodedPayload
//!     → decoder.rs (split query, split header blob, percent-decode)
//!     → DecodedRequest
//! ```
//!
//! # Design Decisions
//! - Every field is encoded on its own, so `&` and `=` never leak into the query
//! - Header names are uppercased (lossy on purpose)
//! - `null` marks an absent cookie or empty body

pub mod decoder;
pub mod encoder;
pub mod headers;

pub use decoder::{decode, DecodedRequest};
pub use encoder::{encode, EncodedPayload, Encoded};
pub use headers::{HeaderList, FIELD_SEPARATOR, PAIR_SEPARATOR};

use thiserror::Error;
use url::form_urlencoded;

/// Marker used for an absent cookie or an empty body.
pub const NULL_MARKER: &str = "null";

/// Errors raised while decoding a payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// A required query parameter is absent.
    #[error("Missing payload field: {0}")]
    MissingField(&'static str),

    /// A header pair has no name/value separator.
    #[error("Malformed header pair: {0}")]
    MalformedHeader(String),

    /// A component still contains a raw query delimiter.
    #[error("Unescaped delimiter in component: {0}")]
    UnescapedDelimiter(String),
}

/// Form-urlencode a single component (space becomes `+`).
pub(crate) fn encode_component(raw: &str) -> String {
    form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}

/// Inverse of [`encode_component`].
pub(crate) fn decode_component(encoded: &str) -> Result<String, DecodeError> {
    if encoded.contains(['&', '=']) {
        return Err(DecodeError::UnescapedDelimiter(encoded.to_string()));
    }
    // A delimiter-free component parses as a single key with no value.
    Ok(form_urlencoded::parse(encoded.as_bytes())
        .next()
        .map(|(key, _)| key.into_owned())
        .unwrap_or_default())
}

/// Encode a nullable text field, keeping a literal `null` distinct from the marker.
pub(crate) fn encode_nullable(value: Option<&str>) -> String {
    match value {
        None => NULL_MARKER.to_string(),
        Some(NULL_MARKER) => "%6Eull".to_string(),
        Some(text) => encode_component(text),
    }
}

/// Inverse of [`encode_nullable`].
pub(crate) fn decode_nullable(encoded: &str) -> Result<Option<String>, DecodeError> {
    if encoded == NULL_MARKER {
        return Ok(None);
    }
    decode_component(encoded).map(Some)
}

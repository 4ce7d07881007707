//! Request encoder: one captured request in, one query string out.

use std::fmt;

use crate::codec::{encode_component, encode_nullable};
use crate::relay::error::RelayError;
use crate::relay::CapturedRequest;

/// The wire payload: `"/?dieuri=…&diemet=…&diehed=…&diecok=…&diebod=…"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedPayload(String);

impl EncodedPayload {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for EncodedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EncodedPayload {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Result of encoding a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub payload: EncodedPayload,
    /// Set when the body could not be represented as text and was sent as `null`.
    pub body_error: Option<RelayError>,
}

impl Encoded {
    pub fn is_degraded(&self) -> bool {
        self.body_error.is_some()
    }
}

/// Encode a captured request. Pure and deterministic.
///
/// A body that is not valid UTF-8 is replaced by the `null` marker and the
/// reason is returned in [`Encoded::body_error`].
pub fn encode(captured: &CapturedRequest) -> Encoded {
    let (body, body_error) = match body_text(captured.body()) {
        Ok(text) => (encode_nullable(text), None),
        Err(e) => (encode_nullable(None), Some(e)),
    };

    let payload = format!(
        "/?dieuri={}&diemet={}&diehed={}&diecok={}&diebod={}",
        encode_component(&captured.uri()),
        encode_component(captured.method()),
        captured.headers().to_blob(),
        encode_nullable(captured.cookie()),
        body,
    );

    Encoded {
        payload: EncodedPayload(payload),
        body_error,
    }
}

fn body_text(body: &[u8]) -> Result<Option<&str>, RelayError> {
    if body.is_empty() {
        return Ok(None);
    }
    std::str::from_utf8(body).map(Some).map_err(|e| {
        RelayError::Encoding(format!(
            "body of {} bytes is not valid UTF-8: {}",
            body.len(),
            e
        ))
    })
}

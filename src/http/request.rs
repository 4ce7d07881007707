//! Request ID generation.
//!
//! # Design Decisions
//! - ID added as early as possible for tracing and echoed on the response
//! - The header is internal to this host and is not relayed to workers

use axum::http::{HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the per-request relay ID.
pub const X_RELAY_ID: HeaderName = HeaderName::from_static("x-relay-id");

/// Generates a UUID v4 relay ID for each request.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRelayId;

impl MakeRequestId for MakeRelayId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Relay ID of a request, or `"unknown"` when the layer did not run.
pub fn relay_id<B>(request: &Request<B>) -> String {
    request
        .headers()
        .get(&X_RELAY_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_ids_are_unique_uuids() {
        let req = Request::builder().body(Body::empty()).unwrap();
        let mut make = MakeRelayId;

        let a = make.make_request_id(&req).unwrap();
        let b = make.make_request_id(&req).unwrap();
        let a = a.header_value().to_str().unwrap();
        assert_ne!(a, b.header_value().to_str().unwrap());
        assert!(Uuid::parse_str(a).is_ok());
    }

    #[test]
    fn test_relay_id_fallback() {
        let req = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(relay_id(&req), "unknown");

        let req = Request::builder()
            .header("x-relay-id", "abc")
            .body(Body::empty())
            .unwrap();
        assert_eq!(relay_id(&req), "abc");
    }
}

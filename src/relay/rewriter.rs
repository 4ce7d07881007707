//! Request rewriter.
//!
//! # Responsibilities
//! - Snapshot the intercepted request
//! - Pick the next worker from the pool
//! - Encode the snapshot into the wire payload
//! - Produce the rewritten `GET https://<worker>:443/?…` request
//!
//! No network I/O happens here; the host sends the result.

use std::sync::Arc;

use crate::codec::{encode, EncodedPayload, HeaderList};
use crate::load_balancer::WorkerPool;
use crate::observability::metrics;
use crate::relay::captured::{CapturedRequest, InterceptedRequest};
use crate::relay::error::{RelayError, RelayResult};

/// Scheme every relayed request is sent with.
pub const WORKER_SCHEME: &str = "https";

/// Port every relayed request is sent to.
pub const WORKER_PORT: u16 = 443;

/// Method every relayed request is sent with.
pub const WORKER_METHOD: &str = "GET";

/// The request as it leaves for a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenRequest {
    pub scheme: &'static str,
    pub host: Arc<str>,
    pub port: u16,
    pub method: &'static str,
    pub path: EncodedPayload,
    /// Original headers with `Host` pointing at the worker and body framing removed.
    pub headers: HeaderList,
    pub body: Vec<u8>,
}

impl RewrittenRequest {
    /// Absolute URL of the rewritten request.
    pub fn url(&self) -> String {
        format!("{}://{}:{}{}", self.scheme, self.host, self.port, self.path)
    }
}

/// Outcome of one relay.
#[derive(Debug, Clone)]
pub struct Relayed {
    pub request: RewrittenRequest,
    /// Encoding problem that was degraded to a `null` marker, if any.
    pub degraded: Option<RelayError>,
}

/// Rewrites intercepted requests to target the worker pool.
#[derive(Debug)]
pub struct RequestRewriter {
    pool: Arc<WorkerPool>,
}

impl RequestRewriter {
    pub fn new(pool: Arc<WorkerPool>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Relay a captured request. Never fails: a body that is not text is
    /// sent as `null` and reported in [`Relayed::degraded`].
    pub fn relay(&self, captured: &CapturedRequest) -> Relayed {
        let worker = self.pool.next();
        let encoded = encode(captured);

        if let Some(err) = &encoded.body_error {
            tracing::warn!(
                uri = %captured.uri(),
                worker = %worker,
                error = %err,
                "Body is not text, relaying with null body"
            );
            metrics::record_degraded_body();
        }

        tracing::debug!(
            method = %captured.method(),
            uri = %captured.uri(),
            worker = %worker,
            payload_len = encoded.payload.len(),
            "Relaying request"
        );
        metrics::record_relay(&worker);

        let mut headers = captured.headers().clone();
        headers.remove("content-length");
        headers.remove("transfer-encoding");
        if headers.get("host").is_some() {
            headers.set("host", worker.to_string());
        }

        Relayed {
            request: RewrittenRequest {
                scheme: WORKER_SCHEME,
                host: worker,
                port: WORKER_PORT,
                method: WORKER_METHOD,
                path: encoded.payload,
                headers,
                body: Vec::new(),
            },
            degraded: encoded.body_error,
        }
    }

    /// Relay a host-owned request in place.
    ///
    /// Capture failures abort before a worker is selected and leave the
    /// request untouched. Otherwise the rewrite is fully computed before
    /// `apply` assigns it.
    pub fn relay_in_place<R: InterceptedRequest + ?Sized>(
        &self,
        request: &mut R,
    ) -> RelayResult<Relayed> {
        let captured = CapturedRequest::capture(request)?;
        let relayed = self.relay(&captured);
        request.apply(&relayed.request);
        Ok(relayed)
    }
}

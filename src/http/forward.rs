//! Upstream send to the selected worker.
//!
//! # Design Decisions
//! - The send sits behind `Forwarder` so the host can be driven without a network
//! - Responses are buffered; workers answer with small documents
//! - Hop-by-hop headers are dropped in both directions

use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, Method, Response};
use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::config::TimeoutConfig;
use crate::http::flow::HttpFlow;

/// Errors raised while sending a rewritten request.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The flow cannot be turned into a request.
    #[error("Invalid upstream target: {0}")]
    InvalidTarget(String),

    /// Connecting to or talking with the worker failed.
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// The worker's response could not be rebuilt.
    #[error("Invalid upstream response: {0}")]
    InvalidResponse(String),
}

/// Sends a rewritten flow and returns the response for the client.
pub trait Forwarder: Send + Sync + 'static {
    fn forward(&self, flow: HttpFlow) -> BoxFuture<'static, Result<Response<Body>, ForwardError>>;
}

/// Forwarder backed by a pooled HTTPS client.
#[derive(Debug, Clone)]
pub struct HttpsForwarder {
    client: reqwest::Client,
}

impl HttpsForwarder {
    pub fn new(timeouts: &TimeoutConfig) -> Result<Self, ForwardError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.request_secs))
            // Relayed requests must reach the worker itself.
            .no_proxy()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { client })
    }
}

impl Forwarder for HttpsForwarder {
    fn forward(&self, flow: HttpFlow) -> BoxFuture<'static, Result<Response<Body>, ForwardError>> {
        let client = self.client.clone();
        Box::pin(async move {
            let url = flow
                .url()
                .ok_or_else(|| ForwardError::InvalidTarget("flow has no host".into()))?;
            let method = Method::from_bytes(flow.method.as_bytes())
                .map_err(|e| ForwardError::InvalidTarget(e.to_string()))?;

            let mut request = client.request(method, url.as_str());
            for (name, value) in flow.headers.iter() {
                if is_hop_by_hop(name) || name.eq_ignore_ascii_case("host") {
                    continue;
                }
                match (
                    HeaderName::from_bytes(name.as_bytes()),
                    HeaderValue::from_str(value),
                ) {
                    (Ok(name), Ok(value)) => request = request.header(name, value),
                    _ => tracing::debug!(header = %name, "Dropping header not valid on the wire"),
                }
            }

            let upstream = request.body(flow.body).send().await?;

            let mut response = Response::builder().status(upstream.status());
            for (name, value) in upstream.headers() {
                if !is_hop_by_hop(name.as_str()) && name != axum::http::header::CONTENT_LENGTH {
                    response = response.header(name, value);
                }
            }
            let body = upstream.bytes().await?;

            response
                .body(Body::from(body))
                .map_err(|e| ForwardError::InvalidResponse(e.to_string()))
        })
    }
}

/// Connection-scoped headers that must not be forwarded.
pub fn is_hop_by_hop(name: &str) -> bool {
    const HOP_BY_HOP: [&str; 9] = [
        "connection",
        "keep-alive",
        "proxy-connection",
        "proxy-authenticate",
        "proxy-authorization",
        "te",
        "trailer",
        "transfer-encoding",
        "upgrade",
    ];
    HOP_BY_HOP.iter().any(|h| name.eq_ignore_ascii_case(h))
}

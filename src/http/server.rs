//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the relay handler
//! - Wire up middleware (tracing, timeout, relay ID)
//! - Buffer request bodies up to the configured limit
//! - Rewrite each request through the relay core
//! - Forward the rewritten request and return the worker's response

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::http::flow::HttpFlow;
use crate::http::forward::Forwarder;
use crate::http::request::{relay_id, MakeRelayId, X_RELAY_ID};
use crate::lifecycle::signals::shutdown_signal;
use crate::observability::metrics;
use crate::relay::RequestRewriter;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub rewriter: Arc<RequestRewriter>,
    pub forwarder: Arc<dyn Forwarder>,
    pub max_body_size: usize,
}

/// HTTP front end of the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server around an existing relay core.
    pub fn new(
        config: RelayConfig,
        rewriter: Arc<RequestRewriter>,
        forwarder: Arc<dyn Forwarder>,
    ) -> Self {
        let state = AppState {
            rewriter,
            forwarder,
            max_body_size: config.security.max_body_size,
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        Router::new()
            .fallback(relay_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(X_RELAY_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_RELAY_ID, MakeRelayId))
    }

    /// The fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until Ctrl+C, SIGTERM or the internal trigger fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: watch::Receiver<bool>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            workers = self.config.workers.endpoints.len(),
            "Relay listening"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("Relay stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

/// Relay handler: buffer, rewrite, forward.
async fn relay_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = relay_id(&request);
    let method = request.method().clone();
    let method_str = method.to_string();

    if method == Method::CONNECT {
        tracing::warn!(request_id = %request_id, uri = %request.uri(), "CONNECT tunnels are not relayed");
        metrics::record_request(&method_str, 501, start_time);
        return (StatusCode::NOT_IMPLEMENTED, "CONNECT is not supported").into_response();
    }

    let (parts, body) = request.into_parts();
    let body = match axum::body::to_bytes(body, state.max_body_size).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, limit = state.max_body_size, "Request body rejected");
            metrics::record_request(&method_str, 413, start_time);
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let mut flow = HttpFlow::from_parts(&parts, body);
    let relayed = match state.rewriter.relay_in_place(&mut flow) {
        Ok(relayed) => relayed,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Request cannot be relayed");
            metrics::record_request(&method_str, 400, start_time);
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };
    let worker = relayed.request.host;

    tracing::debug!(
        request_id = %request_id,
        worker = %worker,
        degraded = relayed.degraded.is_some(),
        "Forwarding to worker"
    );

    match state.forwarder.forward(flow).await {
        Ok(response) => {
            metrics::record_request(&method_str, response.status().as_u16(), start_time);
            response
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, worker = %worker, error = %e, "Upstream error");
            metrics::record_upstream_error(&worker);
            metrics::record_request(&method_str, 502, start_time);
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}

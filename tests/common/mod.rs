//! Shared utilities for integration tests.

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Response, StatusCode};
use futures_util::future::BoxFuture;

use worker_relay::config::RelayConfig;
use worker_relay::http::{Forwarder, ForwardError, HttpFlow, HttpServer};
use worker_relay::lifecycle::startup::build_rewriter;

/// Forwarder that records every flow instead of sending it.
#[derive(Debug, Clone, Default)]
pub struct RecordingForwarder {
    flows: Arc<Mutex<Vec<HttpFlow>>>,
    fail: bool,
}

impl RecordingForwarder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A forwarder whose sends always fail.
    #[allow(dead_code)]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn flows(&self) -> Vec<HttpFlow> {
        self.flows.lock().unwrap().clone()
    }
}

impl Forwarder for RecordingForwarder {
    fn forward(&self, flow: HttpFlow) -> BoxFuture<'static, Result<Response<Body>, ForwardError>> {
        let flows = self.flows.clone();
        let fail = self.fail;
        Box::pin(async move {
            if fail {
                return Err(ForwardError::InvalidTarget("worker unreachable".into()));
            }
            let worker = flow.host.clone().unwrap_or_default();
            flows.lock().unwrap().push(flow);
            Ok(Response::builder()
                .status(StatusCode::OK)
                .header("x-worker", worker)
                .body(Body::from("relayed"))
                .unwrap())
        })
    }
}

/// Config with the given workers and test-friendly defaults.
pub fn config(workers: &[&str]) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.workers.endpoints = workers.iter().map(|w| w.to_string()).collect();
    config.security.max_body_size = 1024;
    config
}

/// Build a server around a recording forwarder.
pub fn server(workers: &[&str], forwarder: RecordingForwarder) -> HttpServer {
    let config = config(workers);
    let rewriter = build_rewriter(&config).unwrap();
    HttpServer::new(config, rewriter, Arc::new(forwarder))
}

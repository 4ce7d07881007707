//! Startup orchestration.

use std::sync::Arc;

use crate::config::RelayConfig;
use crate::load_balancer::WorkerPool;
use crate::relay::{RelayResult, RequestRewriter};

/// Build the relay core from a validated configuration.
///
/// An empty worker list is a configuration error and must abort startup.
pub fn build_rewriter(config: &RelayConfig) -> RelayResult<Arc<RequestRewriter>> {
    let pool = WorkerPool::new(config.workers.endpoints.iter().map(String::as_str))?;

    tracing::info!(
        workers = pool.len(),
        first = %pool.workers()[0],
        "Worker pool ready"
    );

    Ok(Arc::new(RequestRewriter::new(Arc::new(pool))))
}

//! Worker pool.
//!
//! # Responsibilities
//! - Hold the fixed, ordered list of forwarding endpoints
//! - Hand out the next endpoint via round-robin
//! - Reject an empty pool at construction

use std::sync::Arc;

use crate::load_balancer::round_robin::RoundRobin;
use crate::relay::error::{RelayError, RelayResult};

/// Fixed pool of worker endpoints with a shared rotation cursor.
#[derive(Debug)]
pub struct WorkerPool {
    workers: Vec<Arc<str>>,
    selector: RoundRobin,
}

impl WorkerPool {
    /// Build a pool. Fails with a configuration error when `workers` is empty.
    pub fn new<I, S>(workers: I) -> RelayResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        Self::with_selector(workers, RoundRobin::new())
    }

    /// Build a pool whose cursor starts at `cursor`.
    pub fn starting_at<I, S>(workers: I, cursor: usize) -> RelayResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        Self::with_selector(workers, RoundRobin::starting_at(cursor))
    }

    fn with_selector<I, S>(workers: I, selector: RoundRobin) -> RelayResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        let workers: Vec<Arc<str>> = workers.into_iter().map(Into::into).collect();
        if workers.is_empty() {
            return Err(RelayError::Configuration(
                "worker pool requires at least one endpoint".into(),
            ));
        }
        Ok(Self { workers, selector })
    }

    /// Select the next worker endpoint.
    pub fn next(&self) -> Arc<str> {
        // Non-empty by construction.
        let idx = self.selector.next_index(self.workers.len()).unwrap_or(0);
        self.workers[idx].clone()
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// All endpoints in rotation order.
    pub fn workers(&self) -> &[Arc<str>] {
        &self.workers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pool_is_configuration_error() {
        let err = WorkerPool::new(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, RelayError::Configuration(_)));
    }

    #[test]
    fn test_first_second_and_wraparound() {
        let pool = WorkerPool::new(["w0.example", "w1.example"]).unwrap();

        assert_eq!(&*pool.next(), "w1.example");
        assert_eq!(&*pool.next(), "w0.example");
        assert_eq!(&*pool.next(), "w1.example");
    }

    #[test]
    fn test_every_worker_once_per_cycle() {
        let names: Vec<String> = (0..5).map(|i| format!("w{}.example", i)).collect();
        let pool = WorkerPool::new(names.clone()).unwrap();

        let mut cycle: Vec<String> = (0..5).map(|_| pool.next().to_string()).collect();
        cycle.sort();
        assert_eq!(cycle, names);
    }

    #[test]
    fn test_concurrent_selection_is_distinct() {
        let n = 16;
        let pool = Arc::new(WorkerPool::new((0..n).map(|i| format!("w{}", i))).unwrap());

        let handles: Vec<_> = (0..n)
            .map(|_| {
                let pool = pool.clone();
                std::thread::spawn(move || pool.next())
            })
            .collect();

        let mut picked: Vec<String> = handles
            .into_iter()
            .map(|h| h.join().unwrap().to_string())
            .collect();
        picked.sort();
        picked.dedup();
        assert_eq!(picked.len(), n);
    }
}

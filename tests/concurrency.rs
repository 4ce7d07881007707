//! Concurrent relays against a shared worker pool.

use std::collections::HashSet;
use std::sync::Arc;

use worker_relay::codec::HeaderList;
use worker_relay::load_balancer::WorkerPool;
use worker_relay::relay::{CapturedRequest, RequestRewriter};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_relays_get_distinct_workers() {
    let n = 32;
    let workers: Vec<String> = (0..n).map(|i| format!("w{}.example", i)).collect();
    let rewriter = Arc::new(RequestRewriter::new(Arc::new(WorkerPool::new(workers.clone()).unwrap())));

    let tasks: Vec<_> = (0..n)
        .map(|i| {
            let rewriter = rewriter.clone();
            tokio::spawn(async move {
                let captured = CapturedRequest::new(
                    "http",
                    "example.com",
                    format!("/item/{}", i),
                    "GET",
                    HeaderList::new(),
                    Vec::<u8>::new(),
                );
                rewriter.relay(&captured).request.host.to_string()
            })
        })
        .collect();

    let mut picked = HashSet::new();
    for task in tasks {
        assert!(picked.insert(task.await.unwrap()), "worker selected twice");
    }
    assert_eq!(picked, workers.into_iter().collect::<HashSet<_>>());
}

#[test]
fn test_fairness_over_many_rounds() {
    let pool = WorkerPool::new(["a", "b", "c"]).unwrap();
    let rewriter = RequestRewriter::new(Arc::new(pool));
    let captured = CapturedRequest::new("http", "x", "/", "GET", HeaderList::new(), Vec::<u8>::new());

    let mut counts = std::collections::HashMap::new();
    for _ in 0..10 {
        *counts
            .entry(rewriter.relay(&captured).request.host.to_string())
            .or_insert(0usize) += 1;
    }

    let mut values: Vec<_> = counts.values().copied().collect();
    values.sort();
    assert_eq!(values, vec![3, 3, 4]);
}

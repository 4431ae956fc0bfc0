//! Unit tests for minimum-interval rate limiting

use rome_stats::pipeline::RateLimiter;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[tokio::test]
async fn test_sequential_calls_are_spaced() {
    let limiter = RateLimiter::new(Duration::from_millis(30));

    let mut stamps = Vec::new();
    for _ in 0..4 {
        limiter.throttle().await;
        stamps.push(Instant::now());
    }

    for pair in stamps.windows(2) {
        assert!(pair[1] - pair[0] >= Duration::from_millis(29));
    }
    assert_eq!(limiter.call_count(), 4);
}

#[tokio::test]
async fn test_no_wait_once_interval_elapsed() {
    let limiter = RateLimiter::new(Duration::from_millis(10));
    limiter.throttle().await;

    tokio::time::sleep(Duration::from_millis(30)).await;

    assert_eq!(limiter.throttle().await, Duration::ZERO);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_shared_limiter_serializes_concurrent_callers() {
    let limiter = Arc::new(RateLimiter::new(Duration::from_millis(25)));
    let started = Instant::now();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let limiter = limiter.clone();
            tokio::spawn(async move {
                limiter.throttle().await;
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    // four calls need three full intervals
    assert!(started.elapsed() >= Duration::from_millis(75));
    assert_eq!(limiter.call_count(), 4);
}

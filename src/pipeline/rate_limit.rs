//! Minimum-interval rate limiting
//!
//! Every outbound call to the France Travail API (token refresh included)
//! goes through [`RateLimiter::throttle`], which spaces calls by at least a
//! configured interval. The limiter is owned and injected, and its baseline is
//! kept behind an async mutex over a monotonic clock, so a single instance can
//! be shared by concurrent callers without breaking the spacing guarantee.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

use super::config::default_min_interval;

/// Gate enforcing a minimum wall-clock interval between calls
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
    calls: AtomicU64,
}

impl RateLimiter {
    /// Create a limiter with the given minimum interval
    ///
    /// # Arguments
    /// * `min_interval` - Minimum time between two `throttle()` returns
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
            calls: AtomicU64::new(0),
        }
    }

    /// Configured minimum interval
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Number of `throttle()` calls so far
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    /// Wait until the minimum interval has elapsed since the previous call
    ///
    /// The first call returns immediately. The lock is held across the sleep,
    /// so concurrent callers are serialized and each one waits its own slot.
    ///
    /// # Returns
    /// The time spent waiting
    pub async fn throttle(&self) -> Duration {
        let mut last_call = self.last_call.lock().await;
        let mut waited = Duration::ZERO;

        if let Some(previous) = *last_call {
            let now = Instant::now();
            let ready_at = previous + self.min_interval;
            if ready_at > now {
                waited = ready_at - now;
                debug!(wait_ms = waited.as_millis() as u64, "Throttling API call");
                sleep_until(ready_at).await;
            }
        }

        *last_call = Some(Instant::now());
        self.calls.fetch_add(1, Ordering::Relaxed);

        crate::metrics::record_throttle_wait(waited);
        waited
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(default_min_interval())
    }
}

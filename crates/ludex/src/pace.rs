//! Per-source request pacing.
//!
//! Each external source gets its own pacer enforcing a minimum spacing
//! between requests. Sources are fully independent: no pacer state is
//! shared across sources.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};

/// Type alias for the governor rate limiter.
type GovernorRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// A pacer that enforces a minimum spacing between requests to one source.
///
/// `wait()` asynchronously blocks the calling task until at least the
/// configured spacing has elapsed since the last granted turn. Arrival
/// order is FIFO; under a single sequential driver this degenerates to
/// simple pacing. Never errors, always eventually returns.
#[derive(Clone)]
pub struct RequestPacer {
    inner: Arc<GovernorRateLimiter>,
}

impl RequestPacer {
    /// Create a pacer with the given minimum spacing between requests.
    ///
    /// A zero spacing is clamped to 1ms so the quota stays valid.
    #[must_use]
    pub fn new(spacing: Duration) -> Self {
        let spacing = spacing.max(Duration::from_millis(1));
        let quota = Quota::with_period(spacing)
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::new(1).expect("1 is non-zero")));

        Self {
            inner: Arc::new(RateLimiter::direct(quota)),
        }
    }

    /// Create a pacer from a spacing in milliseconds.
    #[must_use]
    pub fn from_millis(spacing_ms: u64) -> Self {
        Self::new(Duration::from_millis(spacing_ms))
    }

    /// Wait until the next request is allowed.
    pub async fn wait(&self) {
        self.inner.until_ready().await;
    }
}

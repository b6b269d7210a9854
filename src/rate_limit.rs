//! Fixed inter-call pacing

use std::time::Duration;
use tokio::time::sleep;

/// Fixed delay applied after each network call, regardless of whether the
/// iteration succeeded, failed, or was skipped.
///
/// The delay is configuration, not load-adaptive backoff; it stays constant
/// across repeated failures.
#[derive(Debug, Clone, Copy)]
pub struct RateLimiter {
    delay: Duration,
}

impl RateLimiter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Suspend until the configured delay has elapsed
    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn pause_waits_for_the_configured_delay() {
        let limiter = RateLimiter::new(Duration::from_millis(500));
        let start = tokio::time::Instant::now();
        limiter.pause().await;
        assert_eq!(start.elapsed(), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_delay_returns_immediately() {
        let limiter = RateLimiter::new(Duration::ZERO);
        let start = tokio::time::Instant::now();
        limiter.pause().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}

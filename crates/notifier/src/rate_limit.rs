//! Minimum-interval rate limiter for webhook deliveries.
//!
//! Only a successful delivery resets the cadence. Failed attempts leave the
//! last-send instant untouched, so a run of failures never pushes the next
//! attempt further out.
//!
//! Lent to one dispatch worker at a time; no locking.

use std::time::Duration;

use tokio::time::Instant;

pub struct RateLimiter {
    min_interval: Duration,
    last_send: Option<Instant>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_send: None,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Change the interval without forgetting the last successful send.
    pub fn set_min_interval(&mut self, min_interval: Duration) {
        self.min_interval = min_interval;
    }

    /// Instant of the last successful delivery, if any.
    pub fn last_send(&self) -> Option<Instant> {
        self.last_send
    }

    /// How long a delivery attempted at `now` has to wait.
    ///
    /// Zero before the first success, or once `min_interval` has elapsed.
    pub fn remaining_at(&self, now: Instant) -> Duration {
        match self.last_send {
            Some(last) => self
                .min_interval
                .saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    pub fn remaining(&self) -> Duration {
        self.remaining_at(Instant::now())
    }

    /// Record a successful delivery at the current instant.
    pub fn record_success(&mut self) {
        self.record_success_at(Instant::now());
    }

    pub fn record_success_at(&mut self, at: Instant) {
        self.last_send = Some(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_delivery_never_waits() {
        let limiter = RateLimiter::new(Duration::from_secs(5));
        assert_eq!(limiter.remaining_at(Instant::now()), Duration::ZERO);
        assert!(limiter.last_send().is_none());
    }

    #[test]
    fn test_wait_shrinks_as_time_passes() {
        let mut limiter = RateLimiter::new(Duration::from_secs(5));
        let sent = Instant::now();
        limiter.record_success_at(sent);

        assert_eq!(limiter.remaining_at(sent), Duration::from_secs(5));
        assert_eq!(
            limiter.remaining_at(sent + Duration::from_secs(2)),
            Duration::from_secs(3)
        );
        assert_eq!(
            limiter.remaining_at(sent + Duration::from_secs(5)),
            Duration::ZERO
        );
        assert_eq!(
            limiter.remaining_at(sent + Duration::from_secs(60)),
            Duration::ZERO
        );
    }

    #[test]
    fn test_clock_before_last_send_waits_full_interval() {
        let mut limiter = RateLimiter::new(Duration::from_secs(5));
        let now = Instant::now();
        limiter.record_success_at(now + Duration::from_secs(1));
        assert_eq!(limiter.remaining_at(now), Duration::from_secs(5));
    }

    #[test]
    fn test_new_interval_keeps_last_send() {
        let mut limiter = RateLimiter::new(Duration::from_secs(5));
        let sent = Instant::now();
        limiter.record_success_at(sent);

        limiter.set_min_interval(Duration::from_secs(10));
        assert_eq!(limiter.last_send(), Some(sent));
        assert_eq!(
            limiter.remaining_at(sent + Duration::from_secs(4)),
            Duration::from_secs(6)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_record_success_uses_current_instant() {
        let mut limiter = RateLimiter::new(Duration::from_secs(5));
        limiter.record_success();
        tokio::time::advance(Duration::from_secs(4)).await;
        assert_eq!(limiter.remaining(), Duration::from_secs(1));
    }
}

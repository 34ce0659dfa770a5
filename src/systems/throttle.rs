//! Rate limiting for bursty events
//!
//! The first call in a quiet period goes through immediately. Calls that
//! arrive within the interval are collapsed into one trailing call, fired
//! one interval after the last of them.

use std::time::{Duration, Instant};

/// Default interval between calls
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(250);

/// Leading-edge throttle with a trailing call
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
    deferred_until: Option<Instant>,
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(DEFAULT_THROTTLE)
    }
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
            deferred_until: None,
        }
    }

    /// Register a call; returns true if it should run now
    pub fn call(&mut self) -> bool {
        self.call_at(Instant::now())
    }

    /// Returns true once the trailing call is due
    pub fn poll(&mut self) -> bool {
        self.poll_at(Instant::now())
    }

    pub fn call_at(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now < last + self.interval => {
                // Each suppressed call pushes the trailing call back
                self.deferred_until = Some(now + self.interval);
                false
            }
            _ => {
                self.last = Some(now);
                self.deferred_until = None;
                true
            }
        }
    }

    pub fn poll_at(&mut self, now: Instant) -> bool {
        match self.deferred_until {
            Some(due) if now >= due => {
                self.last = Some(now);
                self.deferred_until = None;
                true
            }
            _ => false,
        }
    }

    /// Whether a trailing call is waiting
    pub fn is_pending(&self) -> bool {
        self.deferred_until.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_first_call_runs_immediately() {
        let mut throttle = Throttle::default();
        assert!(throttle.call_at(Instant::now()));
        assert!(!throttle.is_pending());
    }

    #[test]
    fn test_burst_collapses_into_trailing_call() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(ms(250));
        assert!(throttle.call_at(t0));
        assert!(!throttle.call_at(t0 + ms(50)));
        assert!(!throttle.call_at(t0 + ms(100)));
        assert!(throttle.is_pending());

        // Trailing call is due 250 ms after the last suppressed call
        assert!(!throttle.poll_at(t0 + ms(300)));
        assert!(throttle.poll_at(t0 + ms(350)));
        assert!(!throttle.is_pending());
        assert!(!throttle.poll_at(t0 + ms(400)));
    }

    #[test]
    fn test_call_after_quiet_period_runs() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(ms(250));
        assert!(throttle.call_at(t0));
        assert!(throttle.call_at(t0 + ms(260)));
        assert!(!throttle.is_pending());
    }
}

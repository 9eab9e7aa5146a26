//! Request pacing between provider calls.
//!
//! The batch fetcher calls [`Pacer::pace`] once after every ticker, whether the
//! request succeeded or not. `FixedInterval` is a blind delay, not a backoff:
//! it never looks at provider responses.

use std::time::Duration;

/// Gate invoked after each provider request.
pub trait Pacer {
    fn pace(&self);
}

/// Sleeps a fixed interval after every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedInterval {
    interval: Duration,
}

impl FixedInterval {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Pacer for FixedInterval {
    fn pace(&self) {
        if !self.interval.is_zero() {
            std::thread::sleep(self.interval);
        }
    }
}

/// No delay at all. Useful for tests and local replays.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

impl Pacer for NoPacing {
    fn pace(&self) {}
}

// Reconnect policies
//
// A policy maps the number of consecutive failed connection attempts to the
// delay before the next one, or `None` to stop retrying.

use std::time::Duration;

pub trait RetryPolicy: Send {
    /// Delay before the next attempt after `attempt` consecutive failures
    /// (starting at 1), or `None` to give up.
    fn next_delay(&mut self, attempt: u32) -> Option<Duration>;
}

/// Same delay every time, never gives up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedInterval {
    pub interval: Duration,
}

impl FixedInterval {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedInterval {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

impl RetryPolicy for FixedInterval {
    fn next_delay(&mut self, _attempt: u32) -> Option<Duration> {
        Some(self.interval)
    }
}

/// Doubling delay capped at `max`, optionally limited to `max_attempts`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialBackoff {
    pub base: Duration,
    pub max: Duration,
    pub max_attempts: Option<u32>,
}

impl RetryPolicy for ExponentialBackoff {
    fn next_delay(&mut self, attempt: u32) -> Option<Duration> {
        if let Some(limit) = self.max_attempts {
            if attempt >= limit {
                return None;
            }
        }
        let shift = attempt.saturating_sub(1).min(31);
        let delay = self.base.saturating_mul(1u32 << shift);
        Some(delay.min(self.max))
    }
}

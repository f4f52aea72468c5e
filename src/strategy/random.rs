use std::time::Duration;

use rand::Rng;

use super::Backoff;

/// Jittered delay drawn uniformly from a millisecond range on every retry.
///
/// Independent callers sharing the same policy spread their retries out instead of hitting a
/// recovering service in lockstep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomBetween {
    min: u64,
    max: u64,
}

/// Create a [`RandomBetween`] yielding whole milliseconds in `[min, max]`, both ends inclusive.
///
/// Bounds given in reverse order are swapped.
///
/// ```
/// use retryable::strategy::{Backoff, random_between};
/// use std::time::Duration;
///
/// let jitter = random_between(100, 250);
/// let delay = jitter.delay(1);
/// assert!(delay >= Duration::from_millis(100) && delay <= Duration::from_millis(250));
/// ```
pub fn random_between(min: u64, max: u64) -> RandomBetween {
    RandomBetween {
        min: min.min(max),
        max: min.max(max),
    }
}

impl RandomBetween {
    /// Lower bound in milliseconds.
    pub fn min(&self) -> u64 {
        self.min
    }

    /// Upper bound in milliseconds.
    pub fn max(&self) -> u64 {
        self.max
    }
}

impl Backoff for RandomBetween {
    fn delay(&self, _attempt: u32) -> Duration {
        let millis = rand::rng().random_range(self.min..=self.max);
        Duration::from_millis(millis)
    }
}

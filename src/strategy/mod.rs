//! Delay strategies for the pause between two attempts.
//!
//! Every strategy is a pure function of the attempt number that just failed (1-indexed), so a
//! single strategy value can be shared by any number of concurrent calls. Plug one into a
//! configuration with [`RetryConfigBuilder::backoff`](crate::RetryConfigBuilder::backoff).

use std::time::Duration;

/// Delay grows by a constant factor on every attempt.
pub mod exponential;
pub use exponential::Exponential;

/// Delay follows the Fibonacci sequence.
pub mod fibonacci;
pub use fibonacci::Fibonacci;

/// The same delay before every retry.
pub mod fixed;
pub use fixed::Fixed;

/// Retry immediately.
pub mod nodelay;
pub use nodelay::NoDelay;

#[cfg(feature = "random")]
mod random;
#[cfg(feature = "random")]
pub use random::{RandomBetween, random_between};

/// Computes how long to wait after a failed attempt before running the next one.
pub trait Backoff {
    /// Delay to apply after `attempt` (1-indexed) failed.
    fn delay(&self, attempt: u32) -> Duration;
}

impl<F> Backoff for F
where
    F: Fn(u32) -> Duration,
{
    fn delay(&self, attempt: u32) -> Duration {
        self(attempt)
    }
}

#[test]
fn closures_are_backoffs() {
    let linear = |attempt: u32| Duration::from_millis(u64::from(attempt) * 100);
    assert_eq!(linear.delay(1), Duration::from_millis(100));
    assert_eq!(linear.delay(3), Duration::from_millis(300));
}

use std::time::Duration;

use super::Backoff;

/// Each retry increases the delay since the last exponentially.
///
/// The delay after attempt `n` is `base * factor^(n - 1)`, saturating at `u64::MAX` milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exponential {
    base: u64,
    factor: f64,
}

impl Exponential {
    /// Create a new [`Exponential`] using the given millisecond duration as the initial delay and
    /// an exponential backoff factor of `2.0`.
    pub fn from_millis(base: u64) -> Self {
        Exponential { base, factor: 2.0 }
    }

    /// Create a new [`Exponential`] using the given millisecond duration as the initial delay and
    /// the given exponential backoff factor.
    pub fn from_millis_with_factor(base: u64, factor: f64) -> Self {
        Exponential { base, factor }
    }
}

impl Backoff for Exponential {
    fn delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let millis = (self.base as f64) * self.factor.powi(exponent);

        if millis >= u64::MAX as f64 {
            Duration::from_millis(u64::MAX)
        } else {
            Duration::from_millis(millis as u64)
        }
    }
}

impl From<Duration> for Exponential {
    fn from(duration: Duration) -> Self {
        Self::from_millis(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }
}

#[test]
fn exponential_with_factor() {
    let backoff = Exponential::from_millis_with_factor(1000, 2.0);
    assert_eq!(backoff.delay(1), Duration::from_millis(1000));
    assert_eq!(backoff.delay(2), Duration::from_millis(2000));
    assert_eq!(backoff.delay(3), Duration::from_millis(4000));
    assert_eq!(backoff.delay(4), Duration::from_millis(8000));
    assert_eq!(backoff.delay(5), Duration::from_millis(16000));
    assert_eq!(backoff.delay(6), Duration::from_millis(32000));
}

#[test]
fn exponential_overflow() {
    let backoff = Exponential::from_millis(u64::MAX);
    assert_eq!(backoff.delay(1), Duration::from_millis(u64::MAX));
    assert_eq!(backoff.delay(2), Duration::from_millis(u64::MAX));
    assert_eq!(backoff.delay(u32::MAX), Duration::from_millis(u64::MAX));
}

#[test]
fn exponential_from_duration() {
    assert_eq!(Exponential::from(Duration::from_secs(2)), Exponential::from_millis(2_000));
    assert_eq!(Exponential::from(Duration::MAX), Exponential::from_millis(u64::MAX));
}

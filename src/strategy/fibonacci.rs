use std::time::Duration;

use super::Backoff;

/// Each retry uses a delay which is the sum of the two previous delays.
///
/// Depending on the problem at hand, a fibonacci delay strategy might perform better and lead to
/// better throughput than the [`Exponential`](super::Exponential) strategy.
///
/// See ["A Performance Comparison of Different Backoff Algorithms under Different Rebroadcast
/// Probabilities for MANETs"](https://www.researchgate.net/publication/255672213_A_Performance_Comparison_of_Different_Backoff_Algorithms_under_Different_Rebroadcast_Probabilities_for_MANET's)
/// for more details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fibonacci {
    millis: u64,
}

impl Fibonacci {
    /// Create a new [`Fibonacci`] using the given duration in milliseconds.
    pub fn from_millis(millis: u64) -> Fibonacci {
        Fibonacci { millis }
    }
}

impl Backoff for Fibonacci {
    fn delay(&self, attempt: u32) -> Duration {
        let (mut curr, mut next) = (self.millis, self.millis);

        for _ in 1..attempt {
            // Both terms stuck at a fixed point: zero base or saturation.
            if next == 0 || curr == u64::MAX {
                break;
            }
            let next_next = curr.saturating_add(next);
            curr = next;
            next = next_next;
        }

        Duration::from_millis(curr)
    }
}

impl From<Duration> for Fibonacci {
    fn from(duration: Duration) -> Self {
        Self::from_millis(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }
}

#[test]
fn fibonacci() {
    let backoff = Fibonacci::from_millis(10);
    assert_eq!(backoff.delay(1), Duration::from_millis(10));
    assert_eq!(backoff.delay(2), Duration::from_millis(10));
    assert_eq!(backoff.delay(3), Duration::from_millis(20));
    assert_eq!(backoff.delay(4), Duration::from_millis(30));
    assert_eq!(backoff.delay(5), Duration::from_millis(50));
    assert_eq!(backoff.delay(6), Duration::from_millis(80));
}

#[test]
fn fibonacci_saturated() {
    let backoff = Fibonacci::from_millis(u64::MAX);
    assert_eq!(backoff.delay(1), Duration::from_millis(u64::MAX));
    assert_eq!(backoff.delay(2), Duration::from_millis(u64::MAX));
    assert_eq!(backoff.delay(u32::MAX), Duration::from_millis(u64::MAX));
}

#[test]
fn fibonacci_from_duration() {
    assert_eq!(Fibonacci::from(Duration::from_secs(2)), Fibonacci::from_millis(2_000));
    assert_eq!(Fibonacci::from(Duration::MAX), Fibonacci::from_millis(u64::MAX));
}

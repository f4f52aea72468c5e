use std::time::Duration;

use super::Backoff;

/// Each retry waits the same amount of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fixed {
    duration: Duration,
}

impl Fixed {
    /// Create a new [`Fixed`] using the given duration in milliseconds.
    pub fn from_millis(millis: u64) -> Self {
        Fixed {
            duration: Duration::from_millis(millis),
        }
    }
}

impl Backoff for Fixed {
    fn delay(&self, _attempt: u32) -> Duration {
        self.duration
    }
}

impl From<Duration> for Fixed {
    fn from(duration: Duration) -> Self {
        Self { duration }
    }
}

#[test]
fn fixed_from_duration() {
    assert_eq!(
        Fixed::from_millis(1_000).delay(1),
        Fixed::from(Duration::from_secs(1)).delay(7),
    );
}

use std::time::Duration;

use super::Backoff;

/// Each retry happens immediately without any delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Backoff for NoDelay {
    fn delay(&self, _attempt: u32) -> Duration {
        Duration::ZERO
    }
}

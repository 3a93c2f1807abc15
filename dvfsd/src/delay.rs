//! Real-time delay device
//!
//! Blocks the calling thread for the full scaled duration of every slice.
//! Elapsed time is measured from construction with a monotonic clock.

use hal::{DelayDevice, DelayError, TimerDevice};
use std::thread;
use std::time::{Duration, Instant};

/// Delay device backed by `std::thread::sleep`
#[derive(Debug, Clone)]
pub struct RealTimeDelay {
    started: Instant,
}

impl RealTimeDelay {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for RealTimeDelay {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayDevice for RealTimeDelay {
    fn delay_ms(&mut self, millis: u64) -> Result<(), DelayError> {
        thread::sleep(Duration::from_millis(millis));
        Ok(())
    }
}

impl TimerDevice for RealTimeDelay {
    fn poll_ticks(&mut self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_blocks_at_least_requested_time() {
        let mut delay = RealTimeDelay::new();
        let before = delay.poll_ticks();
        delay.delay_ms(5).unwrap();
        assert!(delay.poll_ticks() >= before + 5);
    }

    #[test]
    fn test_ticks_are_monotonic() {
        let mut delay = RealTimeDelay::new();
        let t1 = delay.poll_ticks();
        let t2 = delay.poll_ticks();
        assert!(t2 >= t1);
    }
}

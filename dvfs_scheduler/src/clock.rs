//! # Simulated Clock
//!
//! Deterministic delay device for tests and instant runs.
//!
//! Unlike a real sleep, this clock only advances when the scheduler
//! charges time to it. A full run finishes instantly while still
//! reporting how many milliseconds it would have taken.

use hal::{DelayDevice, DelayError, TimerDevice};

/// Simulated clock with controllable time progression
///
/// # Examples
///
/// ```
/// use dvfs_scheduler::SimClock;
/// use hal::{DelayDevice, TimerDevice};
///
/// let mut clock = SimClock::new();
/// clock.delay_ms(63).unwrap();
/// clock.delay_ms(50).unwrap();
/// assert_eq!(clock.poll_ticks(), 113);
/// assert_eq!(clock.delays(), &[63, 50]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    /// Current tick count in milliseconds
    ticks: u64,
    /// Every delay charged, in order
    delays: Vec<u64>,
}

impl SimClock {
    /// Creates a new simulated clock starting at tick 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new simulated clock starting at a specific tick count
    pub fn with_initial_ticks(ticks: u64) -> Self {
        Self {
            ticks,
            delays: Vec::new(),
        }
    }

    /// Returns the current tick count without requiring mutable access
    pub fn current_ticks(&self) -> u64 {
        self.ticks
    }

    /// Returns every delay charged so far
    pub fn delays(&self) -> &[u64] {
        &self.delays
    }
}

impl TimerDevice for SimClock {
    fn poll_ticks(&mut self) -> u64 {
        self.ticks
    }
}

impl DelayDevice for SimClock {
    fn delay_ms(&mut self, millis: u64) -> Result<(), DelayError> {
        self.ticks = self
            .ticks
            .checked_add(millis)
            .ok_or(DelayError::OutOfRange(millis))?;
        self.delays.push(millis);
        Ok(())
    }
}

//! # Timer Device
//!
//! Monotonic elapsed-time measurement.
//!
//! The tick unit throughout this workspace is one millisecond of
//! (possibly simulated) execution time. A timer only reports time; it
//! never blocks. Blocking lives behind [`crate::DelayDevice`].

/// Monotonic tick counter
///
/// # Implementation Notes
///
/// - Must be monotonic (never return a smaller value)
/// - Must not block
/// - One tick is one millisecond
///
/// # Examples
///
/// ```
/// use hal::TimerDevice;
///
/// fn elapsed<T: TimerDevice>(timer: &mut T, start: u64) -> u64 {
///     timer.poll_ticks().saturating_sub(start)
/// }
/// ```
pub trait TimerDevice {
    /// Returns milliseconds elapsed since the device was created
    fn poll_ticks(&mut self) -> u64;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestTimer {
        ticks: u64,
    }

    impl TimerDevice for TestTimer {
        fn poll_ticks(&mut self) -> u64 {
            self.ticks
        }
    }

    #[test]
    fn test_timer_monotonic() {
        let mut timer = TestTimer { ticks: 0 };
        let t1 = timer.poll_ticks();
        timer.ticks += 100;
        let t2 = timer.poll_ticks();

        assert!(t2 >= t1);
        assert_eq!(t2 - t1, 100);
    }
}

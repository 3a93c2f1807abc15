//! # Delay Device
//!
//! Charges a span of execution time to whoever is running.
//!
//! A real implementation blocks the calling thread for the requested
//! number of milliseconds. A simulated implementation advances a counter
//! and returns immediately. Callers must not observe any other difference.
//!
//! A delay runs to completion; there is no cancellation path.

use thiserror::Error;

/// Errors raised by the underlying timing primitive
///
/// These are fatal for the run that observed them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DelayError {
    /// The requested delay cannot be represented by the device
    #[error("Delay of {0} ms exceeds device range")]
    OutOfRange(u64),

    /// The timing primitive itself failed
    #[error("Timing primitive failed: {0}")]
    DeviceFailure(String),
}

/// Blocking (or simulated) delay
pub trait DelayDevice {
    /// Charges `millis` milliseconds of execution time
    ///
    /// Returns only after the full delay has elapsed.
    fn delay_ms(&mut self, millis: u64) -> Result<(), DelayError>;
}

impl<D: DelayDevice + ?Sized> DelayDevice for &mut D {
    fn delay_ms(&mut self, millis: u64) -> Result<(), DelayError> {
        (**self).delay_ms(millis)
    }
}

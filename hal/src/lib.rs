//! # Hardware Abstraction Layer (HAL)
//!
//! This crate defines the time seams the scheduler runs against.
//!
//! ## Philosophy
//!
//! **Time is a service, not a global variable.**
//!
//! The scheduler never calls `std::thread::sleep` or reads a wall clock
//! directly. It charges execution time through a [`DelayDevice`] and
//! observes elapsed time through a [`TimerDevice`]. Tests plug in a
//! simulated clock; the host plugs in real sleeping.
//!
//! ## Design Principles
//!
//! 1. **Trait-based**: All timing goes through traits
//! 2. **Swappable**: Real time and simulated time share one contract
//! 3. **Testable**: Nothing here forces a test to block

pub mod delay;
pub mod timer;

pub use delay::{DelayDevice, DelayError};
pub use timer::TimerDevice;

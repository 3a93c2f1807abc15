//! Load to frequency policy
//!
//! Load is a coarse contention proxy: every contending task counts for
//! 25%. The multiplier rises with load so that backlog drains faster, and
//! drops to the low-power level when the queue is nearly empty. The table
//! is fixed.
//!
//! | load          | multiplier |
//! |---------------|------------|
//! | >= 100        | 1.0        |
//! | 75 ..< 100    | 0.8        |
//! | 50 ..< 75     | 0.6        |
//! | 25 ..< 50     | 0.5        |
//! | < 25          | 0.2        |

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Load contributed by each contending task, in percent
pub const LOAD_PER_TASK_PERCENT: u64 = 25;

/// Converts a contending-task count into a load percentage
///
/// Unbounded above 100; the policy treats anything from 100 up the same.
pub fn load_percent(queue_size: usize) -> u64 {
    (queue_size as u64).saturating_mul(LOAD_PER_TASK_PERCENT)
}

/// Discrete CPU frequency multiplier
///
/// Variants are declared in ascending order so the derived `Ord` matches
/// the multiplier ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "f64", try_from = "f64")]
pub enum FrequencyLevel {
    /// 0.2x, low-power state; also the terminal idle frequency
    Idle,
    /// 0.5x
    Low,
    /// 0.6x
    Medium,
    /// 0.8x
    High,
    /// 1.0x
    Full,
}

impl FrequencyLevel {
    /// All levels in ascending order
    pub const ALL: [FrequencyLevel; 5] = [
        FrequencyLevel::Idle,
        FrequencyLevel::Low,
        FrequencyLevel::Medium,
        FrequencyLevel::High,
        FrequencyLevel::Full,
    ];

    /// Maps a load percentage to a frequency level
    pub fn for_load(load: u64) -> Self {
        match load {
            0..=24 => FrequencyLevel::Idle,
            25..=49 => FrequencyLevel::Low,
            50..=74 => FrequencyLevel::Medium,
            75..=99 => FrequencyLevel::High,
            _ => FrequencyLevel::Full,
        }
    }

    /// Maps a contending-task count to a frequency level
    pub fn for_queue_size(queue_size: usize) -> Self {
        Self::for_load(load_percent(queue_size))
    }

    /// Returns the clock multiplier
    pub fn multiplier(self) -> f64 {
        match self {
            FrequencyLevel::Idle => 0.2,
            FrequencyLevel::Low => 0.5,
            FrequencyLevel::Medium => 0.6,
            FrequencyLevel::High => 0.8,
            FrequencyLevel::Full => 1.0,
        }
    }

    /// Wall-clock milliseconds needed to execute `work_ms` at this frequency
    ///
    /// Rounded to the nearest millisecond and never less than one.
    pub fn scale_duration_ms(self, work_ms: u64) -> u64 {
        let scaled = (work_ms as f64 / self.multiplier()).round();
        if scaled < 1.0 {
            1
        } else {
            scaled as u64
        }
    }
}

impl fmt::Display for FrequencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.multiplier())
    }
}

impl From<FrequencyLevel> for f64 {
    fn from(level: FrequencyLevel) -> Self {
        level.multiplier()
    }
}

/// A multiplier outside the fixed frequency table
#[derive(Debug, Error, PartialEq)]
#[error("Unknown frequency multiplier: {0}")]
pub struct UnknownFrequency(pub f64);

impl TryFrom<f64> for FrequencyLevel {
    type Error = UnknownFrequency;

    fn try_from(multiplier: f64) -> Result<Self, Self::Error> {
        FrequencyLevel::ALL
            .into_iter()
            .find(|level| level.multiplier() == multiplier)
            .ok_or(UnknownFrequency(multiplier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoints() {
        assert_eq!(FrequencyLevel::for_load(0), FrequencyLevel::Idle);
        assert_eq!(FrequencyLevel::for_load(24), FrequencyLevel::Idle);
        assert_eq!(FrequencyLevel::for_load(25), FrequencyLevel::Low);
        assert_eq!(FrequencyLevel::for_load(49), FrequencyLevel::Low);
        assert_eq!(FrequencyLevel::for_load(50), FrequencyLevel::Medium);
        assert_eq!(FrequencyLevel::for_load(74), FrequencyLevel::Medium);
        assert_eq!(FrequencyLevel::for_load(75), FrequencyLevel::High);
        assert_eq!(FrequencyLevel::for_load(99), FrequencyLevel::High);
        assert_eq!(FrequencyLevel::for_load(100), FrequencyLevel::Full);
        assert_eq!(FrequencyLevel::for_load(u64::MAX), FrequencyLevel::Full);
    }

    #[test]
    fn test_queue_size_mapping() {
        assert_eq!(FrequencyLevel::for_queue_size(0), FrequencyLevel::Idle);
        assert_eq!(FrequencyLevel::for_queue_size(1), FrequencyLevel::Low);
        assert_eq!(FrequencyLevel::for_queue_size(2), FrequencyLevel::Medium);
        assert_eq!(FrequencyLevel::for_queue_size(3), FrequencyLevel::High);
        assert_eq!(FrequencyLevel::for_queue_size(4), FrequencyLevel::Full);
        assert_eq!(FrequencyLevel::for_queue_size(40), FrequencyLevel::Full);
    }

    #[test]
    fn test_frequency_is_monotonic_in_load() {
        let mut previous = FrequencyLevel::for_load(0);
        for load in 0..=500 {
            let level = FrequencyLevel::for_load(load);
            assert!(level >= previous, "frequency dropped at load {}", load);
            assert!(level.multiplier() >= previous.multiplier());
            previous = level;
        }
    }

    #[test]
    fn test_multiplier_values_are_the_fixed_table() {
        let values: Vec<f64> = FrequencyLevel::ALL.iter().map(|l| l.multiplier()).collect();
        assert_eq!(values, vec![0.2, 0.5, 0.6, 0.8, 1.0]);
    }

    #[test]
    fn test_load_percent() {
        assert_eq!(load_percent(0), 0);
        assert_eq!(load_percent(3), 75);
        assert_eq!(load_percent(6), 150);
    }

    #[test]
    fn test_scale_duration() {
        assert_eq!(FrequencyLevel::Full.scale_duration_ms(50), 50);
        assert_eq!(FrequencyLevel::High.scale_duration_ms(50), 63);
        assert_eq!(FrequencyLevel::Medium.scale_duration_ms(50), 83);
        assert_eq!(FrequencyLevel::Low.scale_duration_ms(30), 60);
        assert_eq!(FrequencyLevel::Idle.scale_duration_ms(20), 100);
    }

    #[test]
    fn test_scale_duration_never_zero() {
        assert_eq!(FrequencyLevel::Full.scale_duration_ms(0), 1);
    }

    #[test]
    fn test_display_one_decimal() {
        assert_eq!(FrequencyLevel::Full.to_string(), "1.0");
        assert_eq!(FrequencyLevel::Idle.to_string(), "0.2");
        assert_eq!(FrequencyLevel::Medium.to_string(), "0.6");
    }

    #[test]
    fn test_serializes_as_multiplier() {
        assert_eq!(serde_json::to_string(&FrequencyLevel::High).unwrap(), "0.8");
        let level: FrequencyLevel = serde_json::from_str("0.5").unwrap();
        assert_eq!(level, FrequencyLevel::Low);
        assert!(serde_json::from_str::<FrequencyLevel>("0.7").is_err());
    }
}

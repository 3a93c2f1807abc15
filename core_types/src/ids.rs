//! Identifiers and ranks for scheduled entities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a task
///
/// Task ids are assigned by whoever builds the task list and stay the same
/// for every dispatch of that task. Valid ids are strictly positive; the
/// scheduler rejects `0` at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u32);

impl TaskId {
    /// Creates a task ID from a raw number
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw number
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Returns true if this id can be used for scheduling
    pub const fn is_valid(&self) -> bool {
        self.0 > 0
    }
}

impl From<u32> for TaskId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task priority
///
/// Higher values are more urgent. Negative values are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(i32);

impl Priority {
    /// Creates a priority from a raw rank
    pub const fn new(rank: i32) -> Self {
        Self(rank)
    }

    /// Returns the raw rank
    pub const fn rank(&self) -> i32 {
        self.0
    }
}

impl From<i32> for Priority {
    fn from(rank: i32) -> Self {
        Self(rank)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

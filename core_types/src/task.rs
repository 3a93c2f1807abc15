//! Input task description

use crate::{Priority, TaskId};
use serde::{Deserialize, Serialize};

/// One logical task as provided by the caller
///
/// `burst_ms` is the total amount of simulated work the task needs. It is
/// immutable; the scheduler tracks remaining work separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Stable task identity
    pub id: TaskId,
    /// Total execution need in milliseconds
    pub burst_ms: u64,
    /// Scheduling rank, higher is more urgent
    pub priority: Priority,
}

impl TaskSpec {
    /// Creates a task description
    pub fn new(id: u32, burst_ms: u64, priority: i32) -> Self {
        Self {
            id: TaskId::new(id),
            burst_ms,
            priority: Priority::new(priority),
        }
    }
}

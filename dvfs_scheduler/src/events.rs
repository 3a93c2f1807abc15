//! Scheduling events
//!
//! One initialization record, one record per cycle and one final idle
//! record. `Display` renders the human-readable event stream; `Serialize`
//! renders the machine-readable one.

use crate::frequency::FrequencyLevel;
use crate::task::TaskInstance;
use core_types::{Priority, TaskId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A queue entry as shown in the initialization record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedTask {
    pub task_id: TaskId,
    pub priority: Priority,
}

impl From<&TaskInstance> for QueuedTask {
    fn from(task: &TaskInstance) -> Self {
        Self {
            task_id: task.id(),
            priority: task.priority(),
        }
    }
}

impl fmt::Display for QueuedTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Task {} (P={})", self.task_id, self.priority)
    }
}

/// Outcome of one dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    /// 1-based cycle index, never reset
    pub cycle: u64,
    pub task_id: TaskId,
    pub priority: Priority,
    /// Logical work executed in this cycle
    pub slice_ms: u64,
    /// Frequency the slice ran at
    pub freq_before: FrequencyLevel,
    /// Frequency implied by the load after the slice
    pub freq_after: FrequencyLevel,
    /// Post-slice load percentage
    pub load_percent: u64,
    /// Milliseconds charged to the delay device
    pub charged_ms: u64,
    /// Work still outstanding for this task
    pub remaining_ms: u64,
    /// True if the task finished in this cycle
    pub completed: bool,
}

impl CycleReport {
    /// The part of this cycle known before execution time is charged
    pub fn dispatch(&self) -> DispatchNotice {
        DispatchNotice {
            cycle: self.cycle,
            task_id: self.task_id,
            priority: self.priority,
            slice_ms: self.slice_ms,
            freq_before: self.freq_before,
            charged_ms: self.charged_ms,
        }
    }

    /// Renders the post-slice lines: frequency adjustment and completion
    pub fn outcome(&self) -> CycleOutcome<'_> {
        CycleOutcome(self)
    }
}

/// A task selected for a slice whose execution time has not been charged yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchNotice {
    pub cycle: u64,
    pub task_id: TaskId,
    pub priority: Priority,
    pub slice_ms: u64,
    pub freq_before: FrequencyLevel,
    /// Milliseconds about to be charged to the delay device
    pub charged_ms: u64,
}

impl fmt::Display for DispatchNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cycle {}:", self.cycle)?;
        writeln!(
            f,
            "Task Selected: Task {} (P={})",
            self.task_id, self.priority
        )?;
        write!(
            f,
            "Executing Task {} for {} ms at CPU frequency {}x",
            self.task_id, self.slice_ms, self.freq_before
        )
    }
}

/// Post-slice half of a cycle record, see [`CycleReport::outcome`]
pub struct CycleOutcome<'a>(&'a CycleReport);

impl fmt::Display for CycleOutcome<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        write!(
            f,
            "Adjusting CPU frequency to {}x (Load: {}%)",
            report.freq_after, report.load_percent
        )?;
        if report.completed {
            write!(f, "\n\nTask {} completed.", report.task_id)?;
        }
        Ok(())
    }
}

/// Terminal idle transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdleReport {
    pub frequency: FrequencyLevel,
    pub load_percent: u64,
}

impl Default for IdleReport {
    fn default() -> Self {
        Self {
            frequency: FrequencyLevel::Idle,
            load_percent: 0,
        }
    }
}

/// Scheduling event for the audit trail and the output stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScheduleEvent {
    /// Queue contents in extraction order at construction time
    Initialized { queue: Vec<QueuedTask> },
    /// One dispatch cycle
    Cycle(CycleReport),
    /// The queue drained and the CPU switched to idle
    Idle(IdleReport),
}

impl fmt::Display for ScheduleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleEvent::Initialized { queue } => {
                writeln!(f, "Priority Queue after initialization:")?;
                for (index, entry) in queue.iter().enumerate() {
                    if index > 0 {
                        write!(f, " > ")?;
                    }
                    write!(f, "{}", entry)?;
                }
                Ok(())
            }
            ScheduleEvent::Cycle(report) => {
                writeln!(f, "{}", report.dispatch())?;
                write!(f, "{}", report.outcome())
            }
            ScheduleEvent::Idle(report) => {
                writeln!(f, "Queue size = 0; Load = {}%.", report.load_percent)?;
                write!(
                    f,
                    "Switching CPU to idle state at frequency {}x",
                    report.frequency
                )
            }
        }
    }
}

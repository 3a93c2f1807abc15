//! Scheduler error types

use core_types::TaskId;
use hal::DelayError;
use thiserror::Error;

/// Extraction was attempted on an empty ready queue
///
/// The scheduler checks for emptiness before every extraction, so seeing
/// this from a run means the loop itself is broken.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
#[error("Ready queue is empty")]
pub struct EmptyQueueError;

/// Construction-time validation failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Quantum must be a positive number of milliseconds
    #[error("Invalid quantum: {0} ms (must be positive)")]
    InvalidQuantum(u64),

    /// Task ids must be positive
    #[error("Invalid task id: {0} (must be positive)")]
    InvalidTaskId(TaskId),

    /// Burst time must be a positive number of milliseconds
    #[error("Task {task_id} has invalid burst time: {burst_ms} ms (must be positive)")]
    InvalidBurstTime { task_id: TaskId, burst_ms: u64 },

    /// Every task id may appear only once
    #[error("Duplicate task id: {0}")]
    DuplicateTaskId(TaskId),
}

/// Errors surfaced by the scheduler loop
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    /// Input rejected before scheduling started
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// Ready queue contract violated
    #[error("Scheduler invariant violated: {0}")]
    EmptyQueue(#[from] EmptyQueueError),

    /// Delay device failed while charging execution time
    #[error("Delay device failed: {0}")]
    Delay(#[from] DelayError),

    /// The scheduler already reached its terminal idle state
    #[error("Scheduler is idle; no further cycles can run")]
    AlreadyIdle,

    /// A previous cycle failed to charge its execution time. Terminal.
    #[error("Scheduler halted after a delay device failure")]
    Halted,
}

//! # DVFS Priority Scheduler
//!
//! A single-core scheduler simulation combining preemptive priority
//! round-robin dispatch with a load-driven frequency policy.
//!
//! ## Purpose
//!
//! - Runs under `cargo test` with a simulated clock (no sleeping)
//! - Deterministic: same tasks + same quantum => same event stream
//! - Inspectable: every emitted event is kept in an audit log
//!
//! ## Model
//!
//! Each cycle pops the most urgent task from the [`ReadyQueue`], derives a
//! CPU frequency multiplier from the current queue load, charges
//! `slice / frequency` milliseconds to a [`hal::DelayDevice`], and either
//! requeues the task with a fresh sequence number or retires it. When the
//! queue drains the scheduler drops to the idle frequency and stays there.
//!
//! No real work is performed. Throughput is measured in simulated
//! milliseconds only.

pub mod clock;
pub mod error;
pub mod events;
pub mod frequency;
pub mod ready_queue;
pub mod scheduler;
pub mod task;

pub use clock::SimClock;
pub use error::{ConfigError, EmptyQueueError, SchedulerError};
pub use events::{CycleOutcome, CycleReport, DispatchNotice, IdleReport, QueuedTask, ScheduleEvent};
pub use frequency::{load_percent, FrequencyLevel, UnknownFrequency, LOAD_PER_TASK_PERCENT};
pub use ready_queue::ReadyQueue;
pub use scheduler::{DvfsScheduler, RunSummary, SchedulerConfig, SchedulerState, TaskStats};
pub use task::TaskInstance;

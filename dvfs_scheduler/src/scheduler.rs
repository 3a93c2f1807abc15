//! Preemptive priority scheduler with load-driven frequency scaling
//!
//! ## Philosophy
//!
//! - **Determinism first**: Same tasks + same quantum => same schedule.
//! - **No hidden state**: The sequence counter, cycle counter and
//!   frequency all live in the scheduler instance. Two schedulers in one
//!   process never interfere.
//! - **Time is injected**: Execution time is charged to a [`DelayDevice`];
//!   the algorithm never sleeps on its own.
//!
//! ## State machine
//!
//! `Running` while the ready queue has work, then a single transition to
//! `Idle`. Idle is terminal.
//!
//! A delay device failure moves the scheduler to `Failed` instead. The
//! failing cycle is undone first: the selected task goes back into the
//! queue untouched and the cycle counter is rolled back, so the accounting
//! still describes only the slices that were actually charged.
//!
//! ## One cycle
//!
//! 1. Extract the most urgent task.
//! 2. `slice = min(quantum, remaining)`.
//! 3. Load before = queue length + 1 if the task still has work, mapped to
//!    the frequency the slice runs at.
//! 4. Charge `slice / frequency` milliseconds (at least one).
//! 5. Apply the slice.
//! 6. Load after = queue length + 1 if the task still has work. Reported
//!    only; the next cycle recomputes from scratch.
//! 7. Requeue with a fresh sequence, or retire.

use crate::clock::SimClock;
use crate::error::{ConfigError, SchedulerError};
use crate::events::{CycleReport, DispatchNotice, IdleReport, QueuedTask, ScheduleEvent};
use crate::frequency::{load_percent, FrequencyLevel};
use crate::ready_queue::ReadyQueue;
use crate::task::TaskInstance;
use core_types::{Priority, TaskId, TaskSpec};
use hal::DelayDevice;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Scheduler configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Maximum slice per dispatch, in milliseconds
    pub quantum_ms: u64,
}

impl SchedulerConfig {
    pub fn new(quantum_ms: u64) -> Self {
        Self { quantum_ms }
    }

    /// Checks the configuration on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quantum_ms == 0 {
            return Err(ConfigError::InvalidQuantum(self.quantum_ms));
        }
        Ok(())
    }

    /// Checks an input task list
    ///
    /// Ids must be positive and unique; burst times must be positive.
    pub fn validate_tasks(tasks: &[TaskSpec]) -> Result<(), ConfigError> {
        let mut seen = HashSet::with_capacity(tasks.len());
        for spec in tasks {
            if !spec.id.is_valid() {
                return Err(ConfigError::InvalidTaskId(spec.id));
            }
            if spec.burst_ms == 0 {
                return Err(ConfigError::InvalidBurstTime {
                    task_id: spec.id,
                    burst_ms: spec.burst_ms,
                });
            }
            if !seen.insert(spec.id) {
                return Err(ConfigError::DuplicateTaskId(spec.id));
            }
        }
        Ok(())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { quantum_ms: 50 }
    }
}

/// Scheduler lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulerState {
    /// Ready queue may still hold work
    Running,
    /// Queue drained, CPU switched to the idle frequency. Terminal.
    Idle,
    /// The delay device failed. Terminal; no further cycles run.
    Failed,
}

/// Per-task accounting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    pub task_id: TaskId,
    pub priority: Priority,
    pub burst_ms: u64,
    /// Sum of executed slices; equals `burst_ms` once completed
    pub executed_ms: u64,
    /// Number of cycles that selected this task
    pub dispatches: u64,
    pub completed_at_cycle: Option<u64>,
    /// Simulated elapsed time at completion
    pub completed_at_ms: Option<u64>,
}

impl TaskStats {
    fn new(spec: &TaskSpec) -> Self {
        Self {
            task_id: spec.id,
            priority: spec.priority,
            burst_ms: spec.burst_ms,
            executed_ms: 0,
            dispatches: 0,
            completed_at_cycle: None,
            completed_at_ms: None,
        }
    }

    /// Returns true once the task has been retired
    pub fn is_completed(&self) -> bool {
        self.completed_at_cycle.is_some()
    }
}

/// Result of a full run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of dispatch cycles executed
    pub cycles: u64,
    /// Total milliseconds charged to the delay device
    pub simulated_elapsed_ms: u64,
    /// Task ids in the order they completed
    pub completion_order: Vec<TaskId>,
    /// Accounting per task, in input order
    pub tasks: Vec<TaskStats>,
}

/// DVFS-aware priority round-robin scheduler
///
/// Owns the ready queue exclusively. Generic over the delay device so that
/// tests run on a [`SimClock`] and the host runs on real sleeps.
pub struct DvfsScheduler<D: DelayDevice = SimClock> {
    config: SchedulerConfig,
    ready_queue: ReadyQueue,
    delay: D,
    state: SchedulerState,
    /// Process-level multiplier: full speed until the idle transition
    cpu_frequency: FrequencyLevel,
    sequence_counter: u64,
    cycle: u64,
    elapsed_ms: u64,
    stats: Vec<TaskStats>,
    stats_index: HashMap<TaskId, usize>,
    completion_order: Vec<TaskId>,
    /// Every emitted event, starting with initialization
    audit_log: Vec<ScheduleEvent>,
}

impl DvfsScheduler<SimClock> {
    /// Creates a scheduler that runs on simulated time
    pub fn new(config: SchedulerConfig, tasks: &[TaskSpec]) -> Result<Self, SchedulerError> {
        Self::with_delay_device(config, tasks, SimClock::new())
    }
}

impl<D: DelayDevice> DvfsScheduler<D> {
    /// Creates a scheduler charging execution time to `delay`
    ///
    /// Tasks are enqueued in input order, so equal priorities keep their
    /// input order. Invalid input is rejected before anything is queued.
    pub fn with_delay_device(
        config: SchedulerConfig,
        tasks: &[TaskSpec],
        delay: D,
    ) -> Result<Self, SchedulerError> {
        config.validate()?;
        SchedulerConfig::validate_tasks(tasks)?;

        let mut scheduler = Self {
            config,
            ready_queue: ReadyQueue::new(),
            delay,
            state: SchedulerState::Running,
            cpu_frequency: FrequencyLevel::Full,
            sequence_counter: 0,
            cycle: 0,
            elapsed_ms: 0,
            stats: Vec::with_capacity(tasks.len()),
            stats_index: HashMap::with_capacity(tasks.len()),
            completion_order: Vec::new(),
            audit_log: Vec::new(),
        };

        for spec in tasks {
            scheduler
                .stats_index
                .insert(spec.id, scheduler.stats.len());
            scheduler.stats.push(TaskStats::new(spec));
            let sequence = scheduler.next_sequence();
            scheduler.ready_queue.insert(TaskInstance::new(*spec, sequence));
        }

        let initialized = ScheduleEvent::Initialized {
            queue: scheduler.queue_snapshot(),
        };
        debug!("[sched] {}", initialized);
        scheduler.audit_log.push(initialized);

        Ok(scheduler)
    }

    /// Runs one cycle, or the idle transition if the queue is empty
    ///
    /// Returns `AlreadyIdle` once the queue has drained and `Halted` after a
    /// delay device failure.
    pub fn step(&mut self) -> Result<ScheduleEvent, SchedulerError> {
        self.step_with(|_| {})
    }

    /// Runs one cycle, announcing the selected task to `on_dispatch` before
    /// its execution time is charged
    ///
    /// With a real-time delay device this lets the caller show which task
    /// is running while it runs.
    pub fn step_with<F>(&mut self, on_dispatch: F) -> Result<ScheduleEvent, SchedulerError>
    where
        F: FnOnce(&DispatchNotice),
    {
        match self.state {
            SchedulerState::Running => {}
            SchedulerState::Idle => return Err(SchedulerError::AlreadyIdle),
            SchedulerState::Failed => return Err(SchedulerError::Halted),
        }
        if self.ready_queue.is_empty() {
            return Ok(self.enter_idle());
        }

        let mut task = self.ready_queue.extract_max()?;
        let cycle = self.cycle + 1;

        let contending_before = self.ready_queue.len() + usize::from(!task.is_finished());
        let freq_before = FrequencyLevel::for_queue_size(contending_before);

        let slice_ms = self.config.quantum_ms.min(task.remaining_ms());
        let charged_ms = freq_before.scale_duration_ms(slice_ms);

        on_dispatch(&DispatchNotice {
            cycle,
            task_id: task.id(),
            priority: task.priority(),
            slice_ms,
            freq_before,
            charged_ms,
        });

        if let Err(err) = self.delay.delay_ms(charged_ms) {
            warn!(
                "[sched] cycle {} task {}: delay device failed charging {} ms: {}",
                cycle,
                task.id(),
                charged_ms,
                err
            );
            // Nothing has been applied yet; the task keeps its sequence.
            self.ready_queue.insert(task);
            self.state = SchedulerState::Failed;
            return Err(err.into());
        }
        self.cycle = cycle;
        self.elapsed_ms = self.elapsed_ms.saturating_add(charged_ms);

        task.execute(slice_ms);

        let contending_after = self.ready_queue.len() + usize::from(!task.is_finished());
        let freq_after = FrequencyLevel::for_queue_size(contending_after);
        let load = load_percent(contending_after);

        let completed = task.is_finished();
        self.record_dispatch(&task, slice_ms, completed);

        let report = CycleReport {
            cycle: self.cycle,
            task_id: task.id(),
            priority: task.priority(),
            slice_ms,
            freq_before,
            freq_after,
            load_percent: load,
            charged_ms,
            remaining_ms: task.remaining_ms(),
            completed,
        };

        debug!(
            "[sched] cycle {} task {} slice={}ms freq {}x -> {}x load={}% charged={}ms",
            report.cycle,
            report.task_id,
            slice_ms,
            freq_before,
            freq_after,
            load,
            charged_ms
        );

        if completed {
            info!(
                "[sched] task {} completed at cycle {} ({} ms elapsed)",
                task.id(),
                self.cycle,
                self.elapsed_ms
            );
        } else {
            self.requeue(task);
        }

        let event = ScheduleEvent::Cycle(report);
        self.audit_log.push(event.clone());
        Ok(event)
    }

    /// Runs cycles until the scheduler goes idle
    pub fn run(&mut self) -> Result<RunSummary, SchedulerError> {
        self.run_with(|_| {})
    }

    /// Runs cycles until idle, handing each event to `observer` as it happens
    ///
    /// The observer sees cycle events and the final idle event; the
    /// initialization event is available from
    /// [`initialization_event`](Self::initialization_event).
    pub fn run_with<F>(&mut self, mut observer: F) -> Result<RunSummary, SchedulerError>
    where
        F: FnMut(&ScheduleEvent),
    {
        loop {
            let event = self.step()?;
            observer(&event);
            if matches!(event, ScheduleEvent::Idle(_)) {
                break;
            }
        }
        Ok(self.summary())
    }

    /// Queue contents in extraction order
    pub fn queue_snapshot(&self) -> Vec<QueuedTask> {
        self.ready_queue
            .peek_all_in_order()
            .map(QueuedTask::from)
            .collect()
    }

    /// The initialization record emitted at construction
    pub fn initialization_event(&self) -> &ScheduleEvent {
        // The constructor always records initialization first and the log
        // is append-only.
        &self.audit_log[0]
    }

    /// Returns every emitted event, in order
    pub fn audit_log(&self) -> &[ScheduleEvent] {
        &self.audit_log
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == SchedulerState::Idle
    }

    /// Process-level frequency: 1.0x while running, 0.2x once idle
    pub fn cpu_frequency(&self) -> FrequencyLevel {
        self.cpu_frequency
    }

    /// Number of cycles executed so far
    pub fn cycles(&self) -> u64 {
        self.cycle
    }

    /// Milliseconds charged to the delay device so far
    pub fn simulated_elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Number of tasks waiting in the ready queue
    pub fn queue_len(&self) -> usize {
        self.ready_queue.len()
    }

    /// Accounting for one task
    pub fn task_stats(&self, task_id: TaskId) -> Option<&TaskStats> {
        self.stats_index.get(&task_id).map(|&index| &self.stats[index])
    }

    /// Snapshot of the run so far
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            cycles: self.cycle,
            simulated_elapsed_ms: self.elapsed_ms,
            completion_order: self.completion_order.clone(),
            tasks: self.stats.clone(),
        }
    }

    pub fn delay_device(&self) -> &D {
        &self.delay
    }

    pub fn delay_device_mut(&mut self) -> &mut D {
        &mut self.delay
    }

    /// Consumes the scheduler and returns its delay device
    pub fn into_delay_device(self) -> D {
        self.delay
    }

    fn next_sequence(&mut self) -> u64 {
        let sequence = self.sequence_counter;
        self.sequence_counter += 1;
        sequence
    }

    fn requeue(&mut self, mut task: TaskInstance) {
        let sequence = self.next_sequence();
        task.restamp(sequence);
        self.ready_queue.insert(task);
    }

    fn record_dispatch(&mut self, task: &TaskInstance, slice_ms: u64, completed: bool) {
        let Some(&index) = self.stats_index.get(&task.id()) else {
            return;
        };
        let stats = &mut self.stats[index];
        stats.executed_ms += slice_ms;
        stats.dispatches += 1;
        if completed {
            stats.completed_at_cycle = Some(self.cycle);
            stats.completed_at_ms = Some(self.elapsed_ms);
            self.completion_order.push(task.id());
        }
    }

    fn enter_idle(&mut self) -> ScheduleEvent {
        self.state = SchedulerState::Idle;
        self.cpu_frequency = FrequencyLevel::Idle;
        info!(
            "[sched] queue drained after {} cycles; switching CPU to idle at {}x",
            self.cycle, self.cpu_frequency
        );
        let event = ScheduleEvent::Idle(IdleReport {
            frequency: self.cpu_frequency,
            load_percent: 0,
        });
        self.audit_log.push(event.clone());
        event
    }
}

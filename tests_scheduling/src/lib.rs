//! Scheduling Test Utilities
//!
//! Shared builders for the integration tests.
//!
//! ## Test Philosophy
//!
//! - **Simulated time only**: No test sleeps
//! - **Reproducible inputs**: Generated task sets come from a seeded
//!   generator, so a failing seed can be replayed
//! - **Check the stream, not internals**: Assertions read the audit log

use core_types::{TaskId, TaskSpec};
use dvfs_scheduler::{CycleReport, DvfsScheduler, ScheduleEvent, SchedulerConfig, SimClock};

/// The four-task demonstration workload
pub fn demo_tasks() -> Vec<TaskSpec> {
    dvfsd::demonstration_tasks()
}

/// Builds a simulated-time scheduler, panicking on invalid input
pub fn scheduler(tasks: &[TaskSpec], quantum_ms: u64) -> DvfsScheduler<SimClock> {
    DvfsScheduler::new(SchedulerConfig::new(quantum_ms), tasks)
        .expect("test workload must be valid")
}

/// Runs to idle and returns the audit log
pub fn run_to_idle(tasks: &[TaskSpec], quantum_ms: u64) -> Vec<ScheduleEvent> {
    let mut scheduler = scheduler(tasks, quantum_ms);
    scheduler.run().expect("run must reach idle");
    scheduler.audit_log().to_vec()
}

/// Cycle reports from an event stream
pub fn cycle_reports(events: &[ScheduleEvent]) -> Vec<CycleReport> {
    events
        .iter()
        .filter_map(|event| match event {
            ScheduleEvent::Cycle(report) => Some(report.clone()),
            _ => None,
        })
        .collect()
}

/// Task ids in dispatch order
pub fn dispatch_order(events: &[ScheduleEvent]) -> Vec<TaskId> {
    cycle_reports(events).iter().map(|r| r.task_id).collect()
}

/// Small deterministic generator for workload fuzzing
///
/// xorshift64*; never yields the same stream for different non-zero seeds.
pub struct WorkloadGenerator {
    state: u64,
}

impl WorkloadGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed.max(1),
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /// Uniform-ish value in `low..=high`
    pub fn range(&mut self, low: u64, high: u64) -> u64 {
        low + self.next_u64() % (high - low + 1)
    }

    /// Generates `count` tasks with ids `1..=count`
    pub fn tasks(&mut self, count: u32, max_burst_ms: u64, priority_levels: i32) -> Vec<TaskSpec> {
        (1..=count)
            .map(|id| {
                let burst = self.range(1, max_burst_ms);
                let priority = self.range(0, (priority_levels - 1) as u64) as i32;
                TaskSpec::new(id, burst, priority)
            })
            .collect()
    }
}

//! Demonstration Workload Tests
//!
//! Validates the full event stream of the four-task demonstration run,
//! both as rendered text and as structured events.

use core_types::TaskId;
use dvfs_scheduler::{FrequencyLevel, ScheduleEvent};
use dvfsd::{HostConfig, HostRuntime, OutputFormat, Pacing};
use tests_scheduling::{cycle_reports, demo_tasks, dispatch_order, run_to_idle, scheduler};

const GOLDEN: &str = include_str!("golden/demonstration.txt");

/// Test: The text report matches the reference output byte for byte
#[test]
fn test_demonstration_text_report_matches_golden() {
    let config = HostConfig {
        pacing: Pacing::Simulated,
        format: OutputFormat::Text,
        ..HostConfig::default()
    };
    let runtime = HostRuntime::new(config).expect("demonstration workload is valid");

    let mut out = Vec::new();
    runtime.run(&mut out).expect("run reaches idle");

    assert_eq!(String::from_utf8(out).unwrap(), GOLDEN);
}

/// Test: Initial extraction order is 2, 1, 4, 3
#[test]
fn test_initial_extraction_order() {
    let scheduler = scheduler(&demo_tasks(), 50);
    let order: Vec<u32> = scheduler
        .queue_snapshot()
        .iter()
        .map(|entry| entry.task_id.as_u32())
        .collect();
    assert_eq!(order, vec![2, 1, 4, 3]);
}

/// Test: First cycle selects Task 2 at full frequency with load 100%
#[test]
fn test_first_cycle() {
    let events = run_to_idle(&demo_tasks(), 50);
    let first = &cycle_reports(&events)[0];

    assert_eq!(first.task_id, TaskId::new(2));
    assert_eq!(first.slice_ms, 50);
    assert_eq!(first.freq_before, FrequencyLevel::Full);
    assert_eq!(first.load_percent, 100);
}

/// Test: Dispatch order interleaves equal priorities after requeue
#[test]
fn test_dispatch_order() {
    let events = run_to_idle(&demo_tasks(), 50);
    let order: Vec<u32> = dispatch_order(&events).iter().map(|id| id.as_u32()).collect();
    assert_eq!(order, vec![2, 2, 2, 1, 4, 1, 4, 4, 3, 3, 3]);
}

/// Test: Charged durations follow slice / frequency, rounded
#[test]
fn test_charged_durations() {
    let mut scheduler = scheduler(&demo_tasks(), 50);
    let summary = scheduler.run().unwrap();

    let clock = scheduler.into_delay_device();
    assert_eq!(
        clock.delays(),
        &[50, 50, 50, 63, 63, 63, 83, 83, 100, 100, 40]
    );
    assert_eq!(summary.simulated_elapsed_ms, 745);
}

/// Test: Completion times are recorded against simulated time
#[test]
fn test_completion_stats() {
    let mut scheduler = scheduler(&demo_tasks(), 50);
    scheduler.run().unwrap();

    let task2 = scheduler.task_stats(TaskId::new(2)).unwrap();
    assert_eq!(task2.completed_at_cycle, Some(3));
    assert_eq!(task2.completed_at_ms, Some(150));
    assert_eq!(task2.dispatches, 3);

    let task3 = scheduler.task_stats(TaskId::new(3)).unwrap();
    assert_eq!(task3.completed_at_cycle, Some(11));
    assert_eq!(task3.completed_at_ms, Some(745));
}

/// Test: The stream ends with exactly one idle event
#[test]
fn test_stream_shape() {
    let events = run_to_idle(&demo_tasks(), 50);
    assert!(matches!(events.first(), Some(ScheduleEvent::Initialized { .. })));
    assert!(matches!(events.last(), Some(ScheduleEvent::Idle(_))));
    let idle_count = events
        .iter()
        .filter(|event| matches!(event, ScheduleEvent::Idle(_)))
        .count();
    assert_eq!(idle_count, 1);
}

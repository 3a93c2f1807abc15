//! # Host Runtime
//!
//! The loop that ties everything together: resolve workload, build the
//! scheduler on the selected delay device, then step and render until idle.

use crate::args::{HostConfig, OutputFormat, Pacing};
use crate::delay::RealTimeDelay;
use crate::render::{EventRenderer, RenderError};
use crate::workload::{TaskFileError, Workload};
use dvfs_scheduler::{
    DvfsScheduler, RunSummary, ScheduleEvent, SchedulerConfig, SchedulerError, SimClock,
};
use hal::{DelayDevice, TimerDevice};
use log::info;
use std::io::Write;
use thiserror::Error;

/// Host runtime error types
#[derive(Debug, Error)]
pub enum HostRuntimeError {
    #[error("Workload error: {0}")]
    Workload(#[from] TaskFileError),

    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    #[error("Output error: {0}")]
    Render(#[from] RenderError),
}

/// Host runtime
pub struct HostRuntime {
    workload: Workload,
    pacing: Pacing,
    format: OutputFormat,
}

impl HostRuntime {
    /// Creates a runtime, loading and validating the workload up front
    pub fn new(config: HostConfig) -> Result<Self, HostRuntimeError> {
        let workload = Workload::resolve(config.tasks_path.as_deref(), config.quantum_ms)?;
        let scheduler_config = workload.scheduler_config();
        scheduler_config.validate().map_err(SchedulerError::from)?;
        SchedulerConfig::validate_tasks(&workload.tasks).map_err(SchedulerError::from)?;

        info!(
            "[host] workload: {} tasks, quantum {} ms, pacing {:?}",
            workload.tasks.len(),
            workload.quantum_ms,
            config.pacing
        );

        Ok(Self {
            workload,
            pacing: config.pacing,
            format: config.format,
        })
    }

    pub fn workload(&self) -> &Workload {
        &self.workload
    }

    /// Runs the simulation to idle, writing the event stream to `out`
    pub fn run<W: Write>(&self, out: W) -> Result<RunSummary, HostRuntimeError> {
        match self.pacing {
            Pacing::Real => self.run_on(RealTimeDelay::new(), out),
            Pacing::Simulated => self.run_on(SimClock::new(), out),
        }
    }

    fn run_on<D, W>(&self, device: D, out: W) -> Result<RunSummary, HostRuntimeError>
    where
        D: DelayDevice + TimerDevice,
        W: Write,
    {
        let mut renderer = EventRenderer::new(out, self.format);
        renderer.render_input(&self.workload)?;

        let mut scheduler = DvfsScheduler::with_delay_device(
            self.workload.scheduler_config(),
            &self.workload.tasks,
            device,
        )?;
        renderer.render_event(scheduler.initialization_event())?;

        loop {
            let mut dispatched = Ok(());
            let stepped =
                scheduler.step_with(|notice| dispatched = renderer.render_dispatch(notice));
            dispatched?;
            let event = stepped?;
            renderer.render_event(&event)?;
            if matches!(event, ScheduleEvent::Idle(_)) {
                break;
            }
        }

        let summary = scheduler.summary();
        let device_ms = scheduler.delay_device_mut().poll_ticks();
        info!(
            "[host] finished: {} cycles, {} ms charged, {} ms on device clock",
            summary.cycles, summary.simulated_elapsed_ms, device_ms
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::TaskId;

    use hal::DelayError;
    use std::cell::RefCell;
    use std::io;
    use std::rc::Rc;

    /// Writer whose contents stay readable while the runtime owns it
    #[derive(Clone, Default)]
    struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl SharedBuffer {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.borrow()).into_owned()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Delay device that snapshots the output each time it is charged
    struct SnapshotDelay {
        out: SharedBuffer,
        snapshots: Rc<RefCell<Vec<String>>>,
    }

    impl DelayDevice for SnapshotDelay {
        fn delay_ms(&mut self, _millis: u64) -> Result<(), DelayError> {
            self.snapshots.borrow_mut().push(self.out.text());
            Ok(())
        }
    }

    impl TimerDevice for SnapshotDelay {
        fn poll_ticks(&mut self) -> u64 {
            0
        }
    }

    fn simulated(format: OutputFormat) -> HostConfig {
        HostConfig {
            pacing: Pacing::Simulated,
            format,
            ..HostConfig::default()
        }
    }

    #[test]
    fn test_demonstration_run_text() {
        let runtime = HostRuntime::new(simulated(OutputFormat::Text)).unwrap();
        let mut out = Vec::new();
        let summary = runtime.run(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(summary.cycles, 11);
        assert!(text.contains(
            "Priority Queue after initialization:\n\
             Task 2 (P=3) > Task 1 (P=2) > Task 4 (P=2) > Task 3 (P=1)\n\n"
        ));
        assert!(text.contains(
            "Cycle 1:\n\
             Task Selected: Task 2 (P=3)\n\
             Executing Task 2 for 50 ms at CPU frequency 1.0x\n\
             Adjusting CPU frequency to 1.0x (Load: 100%)\n\n"
        ));
        assert!(text.contains("Task 2 completed.\n\n"));
        assert!(text.ends_with(
            "Queue size = 0; Load = 0%.\nSwitching CPU to idle state at frequency 0.2x\n"
        ));
        assert_eq!(
            summary.completion_order,
            vec![TaskId::new(2), TaskId::new(1), TaskId::new(4), TaskId::new(3)]
        );
    }

    #[test]
    fn test_demonstration_run_json() {
        let runtime = HostRuntime::new(simulated(OutputFormat::Json)).unwrap();
        let mut out = Vec::new();
        let summary = runtime.run(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        // initialization + cycles + idle
        assert_eq!(text.lines().count() as u64, summary.cycles + 2);
        for line in text.lines() {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(value["event"].is_string());
        }
    }

    #[test]
    fn test_invalid_quantum_rejected_up_front() {
        let config = HostConfig {
            quantum_ms: Some(0),
            ..simulated(OutputFormat::Text)
        };
        let err = HostRuntime::new(config).err().unwrap();
        assert!(matches!(
            err,
            HostRuntimeError::Scheduler(SchedulerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_cycle_header_written_before_delay() {
        let runtime = HostRuntime::new(simulated(OutputFormat::Text)).unwrap();
        let out = SharedBuffer::default();
        let snapshots = Rc::new(RefCell::new(Vec::new()));
        let device = SnapshotDelay {
            out: out.clone(),
            snapshots: Rc::clone(&snapshots),
        };
        let summary = runtime.run_on(device, out.clone()).unwrap();

        let snapshots = snapshots.borrow();
        assert_eq!(snapshots.len() as u64, summary.cycles);
        assert!(snapshots[0].ends_with(
            "Cycle 1:\n\
             Task Selected: Task 2 (P=3)\n\
             Executing Task 2 for 50 ms at CPU frequency 1.0x\n"
        ));
        assert!(!snapshots[0].contains("Adjusting"));
        assert!(snapshots[1].ends_with("Executing Task 2 for 50 ms at CPU frequency 1.0x\n"));
        assert!(snapshots[1].contains("Adjusting CPU frequency to 1.0x (Load: 100%)\n\nCycle 2:"));
    }
}

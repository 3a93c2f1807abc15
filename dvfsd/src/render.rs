//! # Event Rendering
//!
//! Writes the scheduler's event stream to any `io::Write`.
//!
//! Text mode reproduces the classic report: an input echo, the initial
//! queue order, one block per cycle and the idle notice, separated by
//! blank lines. JSON mode writes one object per event and nothing else.
//!
//! A cycle block can be written in two halves: the dispatch lines before
//! the slice is charged and the adjustment lines after it. The combined
//! text is identical to rendering the finished cycle in one go.

use crate::args::OutputFormat;
use crate::workload::Workload;
use dvfs_scheduler::{DispatchNotice, ScheduleEvent};
use std::io::{self, Write};
use thiserror::Error;

/// Rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Renders events in the configured format
pub struct EventRenderer<W: Write> {
    out: W,
    format: OutputFormat,
    /// Cycle whose dispatch lines are already written
    dispatched: Option<u64>,
}

impl<W: Write> EventRenderer<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            dispatched: None,
        }
    }

    /// Echoes the workload before initialization (text mode only)
    pub fn render_input(&mut self, workload: &Workload) -> Result<(), RenderError> {
        if self.format != OutputFormat::Text {
            return Ok(());
        }
        writeln!(self.out, "Input Data")?;
        writeln!(self.out)?;
        writeln!(self.out, "Tasks:")?;
        for task in &workload.tasks {
            writeln!(
                self.out,
                "Task {}: Burst Time = {} ms, Priority = {}",
                task.id, task.burst_ms, task.priority
            )?;
        }
        writeln!(self.out)?;
        writeln!(self.out, "Quantum = {} ms", workload.quantum_ms)?;
        writeln!(self.out)?;
        writeln!(self.out, "Initialization")?;
        Ok(())
    }

    /// Writes the dispatch lines of a cycle that is about to run (text mode
    /// only) and flushes
    pub fn render_dispatch(&mut self, notice: &DispatchNotice) -> Result<(), RenderError> {
        if self.format != OutputFormat::Text {
            return Ok(());
        }
        writeln!(self.out, "{}", notice)?;
        self.out.flush()?;
        self.dispatched = Some(notice.cycle);
        Ok(())
    }

    /// Renders one event and flushes, so real-time runs show progress
    ///
    /// A cycle whose dispatch lines were already written only gets its
    /// remaining lines.
    pub fn render_event(&mut self, event: &ScheduleEvent) -> Result<(), RenderError> {
        match self.format {
            OutputFormat::Text => match event {
                ScheduleEvent::Idle(_) => writeln!(self.out, "{}", event)?,
                ScheduleEvent::Cycle(report) if self.dispatched == Some(report.cycle) => {
                    self.dispatched = None;
                    writeln!(self.out, "{}\n", report.outcome())?
                }
                _ => writeln!(self.out, "{}\n", event)?,
            },
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, event)?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    /// Returns the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{Priority, TaskId};
    use dvfs_scheduler::{CycleReport, FrequencyLevel, IdleReport};

    fn cycle_report() -> CycleReport {
        CycleReport {
            cycle: 4,
            task_id: TaskId::new(1),
            priority: Priority::new(2),
            slice_ms: 50,
            freq_before: FrequencyLevel::High,
            freq_after: FrequencyLevel::High,
            load_percent: 75,
            charged_ms: 63,
            remaining_ms: 50,
            completed: false,
        }
    }

    fn render(format: OutputFormat, events: &[ScheduleEvent]) -> String {
        let mut renderer = EventRenderer::new(Vec::new(), format);
        for event in events {
            renderer.render_event(event).unwrap();
        }
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn test_input_echo() {
        let workload = Workload {
            tasks: crate::workload::demonstration_tasks(),
            quantum_ms: 50,
        };
        let mut renderer = EventRenderer::new(Vec::new(), OutputFormat::Text);
        renderer.render_input(&workload).unwrap();
        let text = String::from_utf8(renderer.into_inner()).unwrap();

        assert!(text.starts_with("Input Data\n\nTasks:\nTask 1: Burst Time = 100 ms, Priority = 2\n"));
        assert!(text.ends_with("\nQuantum = 50 ms\n\nInitialization\n"));
    }

    #[test]
    fn test_input_echo_skipped_for_json() {
        let workload = Workload {
            tasks: crate::workload::demonstration_tasks(),
            quantum_ms: 50,
        };
        let mut renderer = EventRenderer::new(Vec::new(), OutputFormat::Json);
        renderer.render_input(&workload).unwrap();
        assert!(renderer.into_inner().is_empty());
    }

    #[test]
    fn test_text_idle_has_no_trailing_blank_line() {
        let text = render(
            OutputFormat::Text,
            &[ScheduleEvent::Idle(IdleReport::default())],
        );
        assert_eq!(
            text,
            "Queue size = 0; Load = 0%.\nSwitching CPU to idle state at frequency 0.2x\n"
        );
    }

    #[test]
    fn test_text_initialization_followed_by_blank_line() {
        let text = render(
            OutputFormat::Text,
            &[ScheduleEvent::Initialized { queue: Vec::new() }],
        );
        assert_eq!(text, "Priority Queue after initialization:\n\n\n");
    }

    #[test]
    fn test_json_lines() {
        let text = render(
            OutputFormat::Json,
            &[
                ScheduleEvent::Initialized { queue: Vec::new() },
                ScheduleEvent::Idle(IdleReport::default()),
            ],
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let idle: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(idle["event"], "idle");
    }

    #[test]
    fn test_split_cycle_matches_whole_cycle() {
        let report = cycle_report();
        let whole = render(OutputFormat::Text, &[ScheduleEvent::Cycle(report.clone())]);

        let mut renderer = EventRenderer::new(Vec::new(), OutputFormat::Text);
        renderer.render_dispatch(&report.dispatch()).unwrap();
        renderer.render_event(&ScheduleEvent::Cycle(report)).unwrap();
        let split = String::from_utf8(renderer.into_inner()).unwrap();

        assert_eq!(split, whole);
    }

    #[test]
    fn test_dispatch_lines_written_before_outcome() {
        let report = cycle_report();
        let mut renderer = EventRenderer::new(Vec::new(), OutputFormat::Text);
        renderer.render_dispatch(&report.dispatch()).unwrap();
        let text = String::from_utf8(renderer.into_inner()).unwrap();

        assert_eq!(
            text,
            "Cycle 4:\n\
             Task Selected: Task 1 (P=2)\n\
             Executing Task 1 for 50 ms at CPU frequency 0.8x\n"
        );
    }

    #[test]
    fn test_dispatch_not_written_for_json() {
        let mut renderer = EventRenderer::new(Vec::new(), OutputFormat::Json);
        renderer
            .render_dispatch(&cycle_report().dispatch())
            .unwrap();
        assert!(renderer.into_inner().is_empty());
    }
}

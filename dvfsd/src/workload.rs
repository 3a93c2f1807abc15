//! # Workload Loading
//!
//! A workload is the task list plus the quantum. It comes from a JSON task
//! file or, without one, from the built-in demonstration set.
//!
//! Two file shapes are accepted:
//!
//! ```json
//! [{ "id": 1, "burst_ms": 100, "priority": 2 }]
//! ```
//!
//! ```json
//! { "quantum_ms": 50, "tasks": [{ "id": 1, "burst_ms": 100, "priority": 2 }] }
//! ```
//!
//! Quantum precedence: command line, then file, then
//! [`SchedulerConfig::default`].

use core_types::TaskSpec;
use dvfs_scheduler::SchedulerConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Task file errors
#[derive(Debug, Error)]
pub enum TaskFileError {
    #[error("Failed to read task file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse task file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TaskFile {
    List(Vec<TaskSpec>),
    Document {
        #[serde(default)]
        quantum_ms: Option<u64>,
        tasks: Vec<TaskSpec>,
    },
}

/// Everything the scheduler consumes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    pub tasks: Vec<TaskSpec>,
    pub quantum_ms: u64,
}

impl Workload {
    /// Builds a workload from an optional task file and quantum override
    pub fn resolve(
        tasks_path: Option<&Path>,
        quantum_override: Option<u64>,
    ) -> Result<Self, TaskFileError> {
        let (tasks, file_quantum) = match tasks_path {
            Some(path) => load_task_file(path)?,
            None => (demonstration_tasks(), None),
        };
        let quantum_ms = quantum_override
            .or(file_quantum)
            .unwrap_or(SchedulerConfig::default().quantum_ms);
        Ok(Self { tasks, quantum_ms })
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig::new(self.quantum_ms)
    }
}

/// Reads a task file, returning its tasks and optional quantum
pub fn load_task_file(path: &Path) -> Result<(Vec<TaskSpec>, Option<u64>), TaskFileError> {
    let text = fs::read_to_string(path).map_err(|source| TaskFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: TaskFile = serde_json::from_str(&text).map_err(|source| TaskFileError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(match parsed {
        TaskFile::List(tasks) => (tasks, None),
        TaskFile::Document { quantum_ms, tasks } => (tasks, quantum_ms),
    })
}

/// The four-task demonstration set
pub fn demonstration_tasks() -> Vec<TaskSpec> {
    vec![
        TaskSpec::new(1, 100, 2),
        TaskSpec::new(2, 150, 3),
        TaskSpec::new(3, 120, 1),
        TaskSpec::new(4, 150, 2),
    ]
}

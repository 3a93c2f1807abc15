//! # DVFS Scheduler Host
//!
//! This crate provides the host driver for the DVFS scheduler simulation.
//!
//! ## Philosophy
//!
//! - **Host owns I/O**: The scheduler never prints; it returns events
//! - **Output is a rendering of events**: Text for people, JSON lines for tools
//! - **Deterministic mode is first-class**: Simulated pacing never sleeps
//!
//! ## Responsibilities
//!
//! The host:
//! - Parses command-line options
//! - Loads the workload (task file or the built-in demonstration set)
//! - Picks the delay device (real sleeps or simulated clock)
//! - Renders every scheduling event to the output stream
//! - Installs the structured logger
//!
//! ## Non-Responsibilities
//!
//! The host does NOT:
//! - Make scheduling decisions
//! - Configure the frequency table (it is fixed policy)

pub mod args;
pub mod delay;
pub mod render;
pub mod runtime;
pub mod workload;

pub use args::{parse_args, ArgsError, Command, HostConfig, OutputFormat, Pacing};
pub use delay::RealTimeDelay;
pub use render::{EventRenderer, RenderError};
pub use runtime::{HostRuntime, HostRuntimeError};
pub use workload::{demonstration_tasks, load_task_file, TaskFileError, Workload};

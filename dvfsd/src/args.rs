//! # Command-Line Options
//!
//! Turns `argv` into a [`HostConfig`]. Only the workload (task list and
//! quantum) changes scheduling; everything else selects how the run is
//! paced and presented.

use services_logger::{LogLevel, ParseLogLevelError};
use std::path::PathBuf;
use thiserror::Error;

/// Argument parsing errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgsError {
    #[error("Missing value for {0}")]
    MissingValue(String),

    #[error("Invalid quantum value: {0}")]
    InvalidQuantum(String),

    #[error("Invalid pacing: {0} (expected real or simulated)")]
    InvalidPacing(String),

    #[error("Invalid format: {0} (expected text or json)")]
    InvalidFormat(String),

    #[error(transparent)]
    InvalidLogLevel(#[from] ParseLogLevelError),

    #[error("Unknown option: {0}")]
    UnknownOption(String),
}

/// How execution time is charged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Block for the scaled duration of every slice
    Real,
    /// Advance a simulated clock and return immediately
    Simulated,
}

/// Output encoding of the event stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable report
    Text,
    /// One JSON object per event
    Json,
}

/// Host configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// Task file; the demonstration set is used when absent
    pub tasks_path: Option<PathBuf>,
    /// Quantum override; takes precedence over the task file
    pub quantum_ms: Option<u64>,
    pub pacing: Pacing,
    pub format: OutputFormat,
    pub log_level: LogLevel,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            tasks_path: None,
            quantum_ms: None,
            pacing: Pacing::Real,
            format: OutputFormat::Text,
            log_level: LogLevel::Warn,
        }
    }
}

/// What the command line asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(HostConfig),
    Help,
}

/// Parses options (without the program name)
pub fn parse_args(args: &[String]) -> Result<Command, ArgsError> {
    let mut config = HostConfig::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let mut value = || {
            iter.next()
                .ok_or_else(|| ArgsError::MissingValue(arg.clone()))
        };
        match arg.as_str() {
            "--tasks" | "-t" => {
                config.tasks_path = Some(PathBuf::from(value()?));
            }
            "--quantum" | "-q" => {
                let raw = value()?;
                let quantum = raw
                    .parse::<u64>()
                    .map_err(|_| ArgsError::InvalidQuantum(raw.clone()))?;
                config.quantum_ms = Some(quantum);
            }
            "--pacing" | "-p" => {
                config.pacing = match value()?.as_str() {
                    "real" => Pacing::Real,
                    "simulated" | "sim" => Pacing::Simulated,
                    other => return Err(ArgsError::InvalidPacing(other.to_string())),
                };
            }
            "--format" | "-f" => {
                config.format = match value()?.as_str() {
                    "text" => OutputFormat::Text,
                    "json" => OutputFormat::Json,
                    other => return Err(ArgsError::InvalidFormat(other.to_string())),
                };
            }
            "--log-level" | "-l" => {
                config.log_level = value()?.parse()?;
            }
            "--help" | "-h" => return Ok(Command::Help),
            other => return Err(ArgsError::UnknownOption(other.to_string())),
        }
    }

    Ok(Command::Run(config))
}

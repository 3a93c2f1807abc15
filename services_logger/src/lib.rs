//! # Logger Service
//!
//! This crate implements structured logging for the host.
//!
//! ## Philosophy
//!
//! Logging is explicit and structured, not printf-style. Library crates
//! speak the `log` facade; the host installs [`HostLogger`] once, which
//! turns every record into a [`LogEntry`] and writes it to stderr.
//! The scheduler's event stream is output, not logging, and never passes
//! through here.

use log::{LevelFilter, Log, Metadata, Record};
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use std::sync::Mutex;
use thiserror::Error;

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Debug information
    Debug,
    /// Informational messages
    Info,
    /// Warnings
    Warn,
    /// Errors
    Error,
}

impl LogLevel {
    /// Returns the `log` filter that admits this level and everything above it
    pub fn to_filter(self) -> LevelFilter {
        match self {
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => LogLevel::Error,
            log::Level::Warn => LogLevel::Warn,
            log::Level::Info => LogLevel::Info,
            // Trace is folded into Debug
            log::Level::Debug | log::Level::Trace => LogLevel::Debug,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => f.pad("DEBUG"),
            LogLevel::Info => f.pad("INFO"),
            LogLevel::Warn => f.pad("WARN"),
            LogLevel::Error => f.pad("ERROR"),
        }
    }
}

/// Unrecognized log level name
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid log level: {0} (expected error, warn, info or debug)")]
pub struct ParseLogLevelError(pub String);

impl FromStr for LogLevel {
    type Err = ParseLogLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ParseLogLevelError(s.to_string())),
        }
    }
}

/// A structured log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Module path or target of the record
    pub target: String,
    /// Log message
    pub message: String,
    /// Structured fields
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    /// Creates a new log entry
    pub fn new(level: LogLevel, message: String) -> Self {
        Self {
            level,
            target: String::new(),
            message,
            fields: Vec::new(),
        }
    }

    /// Builds an entry from a `log` record
    pub fn from_record(record: &Record<'_>) -> Self {
        let mut entry = Self::new(record.level().into(), record.args().to_string());
        entry.target = record.target().to_string();
        if let (Some(file), Some(line)) = (record.file(), record.line()) {
            entry = entry.with_field("at".to_string(), format!("{}:{}", file, line));
        }
        entry
    }

    /// Adds a field to the log entry
    pub fn with_field(mut self, key: String, value: String) -> Self {
        self.fields.push((key, value));
        self
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:<5}]", self.level)?;
        if !self.target.is_empty() {
            write!(f, " {}:", self.target)?;
        }
        write!(f, " {}", self.message)?;
        for (key, value) in &self.fields {
            write!(f, " {}={}", key, value)?;
        }
        Ok(())
    }
}

/// `log` backend for the host binary
///
/// Writes one line per record to stderr. With capture enabled it also
/// keeps every entry in memory for inspection.
pub struct HostLogger {
    max_level: LogLevel,
    captured: Option<Mutex<Vec<LogEntry>>>,
}

impl HostLogger {
    /// Creates a logger admitting `max_level` and above
    pub fn new(max_level: LogLevel) -> Self {
        Self {
            max_level,
            captured: None,
        }
    }

    /// Keeps a copy of every admitted entry
    pub fn with_capture(mut self) -> Self {
        self.captured = Some(Mutex::new(Vec::new()));
        self
    }

    /// Installs this logger as the process-wide `log` backend
    ///
    /// Fails if a logger was already installed.
    pub fn install(self) -> Result<(), log::SetLoggerError> {
        let filter = self.max_level.to_filter();
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(filter);
        Ok(())
    }

    /// Returns captured entries (empty unless capture is enabled)
    pub fn captured(&self) -> Vec<LogEntry> {
        self.captured
            .as_ref()
            .and_then(|entries| entries.lock().ok().map(|entries| entries.clone()))
            .unwrap_or_default()
    }

    fn admits(&self, level: LogLevel) -> bool {
        level >= self.max_level
    }
}

impl Log for HostLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.admits(metadata.level().into())
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let entry = LogEntry::from_record(record);
        // A closed stderr must not abort the run
        let _ = writeln!(std::io::stderr().lock(), "{}", entry);
        if let Some(captured) = &self.captured {
            if let Ok(mut entries) = captured.lock() {
                entries.push(entry);
            }
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

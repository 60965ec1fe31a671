//! Multi-target logger.
//!
//! A [`Logger`] forwards every [`LogMessage`] to all of its targets, without
//! filtering on the level.

use crate::core::{Sink, Subscriber};
use crate::error::BroadcastError;
use crate::registry::{Registry, SubscriberId};
use anyhow::Result;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Debug,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogMessage {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Local>,
}

impl LogMessage {
    /// Creates a message stamped with the current local time.
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self::with_timestamp(level, message, Local::now())
    }

    pub fn with_timestamp(
        level: LogLevel,
        message: impl Into<String>,
        timestamp: DateTime<Local>,
    ) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp,
        }
    }

    /// Renders the message as `[<time>] [<LEVEL>] <text>`.
    pub fn render(&self) -> String {
        format!(
            "[{}] [{}] {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.level,
            self.message
        )
    }
}

/// A destination for log messages.
pub type LogTarget = dyn Subscriber<LogMessage>;

#[derive(Default)]
pub struct Logger {
    targets: Registry<LogMessage>,
}

impl Logger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_target(&self, target: Arc<LogTarget>) -> SubscriberId {
        self.targets.add(target)
    }

    pub fn remove_target<S: ?Sized>(&self, target: &Arc<S>) -> bool {
        self.targets.remove(target)
    }

    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// Writes `message` to every target.
    ///
    /// Returns the number of targets written to.
    pub fn send(&self, message: &LogMessage) -> Result<usize, BroadcastError> {
        self.targets.broadcast(message)
    }
}

fn target_line(target: &str, message: &LogMessage) -> String {
    format!(
        "{}. This is the log message from {}",
        message.render(),
        target
    )
}

/// Simulated log file target.
pub struct FileLogger {
    sink: Arc<dyn Sink>,
}

impl FileLogger {
    pub fn new(sink: Arc<dyn Sink>) -> Self {
        Self { sink }
    }
}

impl Subscriber<LogMessage> for FileLogger {
    fn name(&self) -> &str {
        "file"
    }

    fn receive(&self, message: &LogMessage) -> Result<()> {
        self.sink.emit(&target_line("File", message))
    }
}

pub struct ConsoleLogger {
    sink: Arc<dyn Sink>,
}

impl ConsoleLogger {
    pub fn new(sink: Arc<dyn Sink>) -> Self {
        Self { sink }
    }
}

impl Subscriber<LogMessage> for ConsoleLogger {
    fn name(&self) -> &str {
        "console"
    }

    fn receive(&self, message: &LogMessage) -> Result<()> {
        self.sink.emit(&target_line("Console", message))
    }
}

//! In-memory sinks for tests.

use crate::core::{terminate_line, Sink};
use anyhow::{bail, Result};
use std::sync::{Arc, Mutex, PoisonError};

/// A sink that records every emitted line, `<br>` marker included.
///
/// Clones share the same buffer, so one clone can be handed to subscribers
/// while the test keeps another to inspect.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines emitted so far, in order.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of lines emitted so far.
    pub fn count(&self) -> usize {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Drops every recorded line.
    pub fn clear(&self) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Sink for MemorySink {
    fn emit(&self, line: &str) -> Result<()> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(terminate_line(line));
        Ok(())
    }
}

/// A sink whose every write fails.
#[derive(Clone, Debug, Default)]
pub struct FailingSink;

impl Sink for FailingSink {
    fn emit(&self, _line: &str) -> Result<()> {
        bail!("sink is closed")
    }
}

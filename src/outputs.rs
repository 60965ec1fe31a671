//! Output sinks
//!
//! Subscribers never print directly; they hand each rendered line to a
//! [`Sink`]. The binary uses [`ConsoleSink`], tests swap in the in-memory
//! sinks from `test_utils`.

use crate::core::{terminate_line, Sink};
use anyhow::{Context, Result};
use std::io::{self, Write};

/// Writes each line, followed by the `<br>` marker and a newline, to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

impl Sink for ConsoleSink {
    fn emit(&self, line: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", terminate_line(line)).context("failed to write to stdout")?;
        Ok(())
    }
}

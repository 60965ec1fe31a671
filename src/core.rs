//! Core service traits for fanout
//!
//! This module defines the two trait contracts every scenario is built on:
//! [`Subscriber`], the single "receive" capability a publisher broadcasts to,
//! and [`Sink`], the line destination a subscriber writes its rendering to.

use anyhow::Result;

/// Marker written after every rendered notification line.
pub const LINE_BREAK_MARKER: &str = "<br>";

// =============================================================================
// Service Traits
// =============================================================================

/// Receives payloads broadcast by a publisher.
///
/// `P` is the payload type of the publisher the subscriber registers with:
/// `StockNotification`, `LogMessage`, or a plain `str` for the newsletter.
pub trait Subscriber<P: ?Sized>: Send + Sync {
    /// A short, descriptive name for the subscriber (e.g., "sms", "website").
    /// Used for logging and failure reports.
    fn name(&self) -> &str;

    /// Handles one broadcast payload.
    ///
    /// # Returns
    /// * `Ok(())` if the payload was rendered and written
    /// * `Err` if the subscriber could not deliver it
    fn receive(&self, payload: &P) -> Result<()>;
}

/// A destination for rendered notification lines.
pub trait Sink: Send + Sync {
    /// Writes one line. The line is passed without its terminator; the sink
    /// appends [`LINE_BREAK_MARKER`] and whatever line ending it uses.
    fn emit(&self, line: &str) -> Result<()>;
}

/// Appends the line-break marker to a rendered line.
pub fn terminate_line(line: &str) -> String {
    format!("{} {}", line, LINE_BREAK_MARKER)
}

//! Console Display
//!
//! Spinner frames and the live gas countdown are written to a `DisplaySink`
//! (a single overwritable status line). They run as independent tasks that
//! never touch control flow; the owning operation stops them when it ends.
//!
//! Created: 2026-02-03

pub mod live_gas;
pub mod spinner;

pub use live_gas::{wait_with_live_gas, LiveGasSchedule};
pub use spinner::Spinner;

use std::io::Write;
use std::sync::Arc;

/// Braille spinner frames
pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Single-line status surface
pub trait DisplaySink: Send + Sync {
    /// Replace the status line
    fn render(&self, line: &str);
    /// Erase the status line
    fn clear(&self);
}

pub type SharedSink = Arc<dyn DisplaySink>;

/// Carriage-return status line on stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl DisplaySink for ConsoleSink {
    fn render(&self, line: &str) {
        let mut out = std::io::stdout().lock();
        let _ = write!(out, "\r\x1b[K{}", line);
        let _ = out.flush();
    }

    fn clear(&self) {
        let mut out = std::io::stdout().lock();
        let _ = write!(out, "\r\x1b[K");
        let _ = out.flush();
    }
}

/// Discards everything (non-interactive runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DisplaySink for NullSink {
    fn render(&self, _line: &str) {}
    fn clear(&self) {}
}

/// Remaining time as "{m}m {s}s"
pub fn format_countdown(remaining: std::time::Duration) -> String {
    let secs = remaining.as_secs();
    format!("{}m {}s", secs / 60, secs % 60)
}

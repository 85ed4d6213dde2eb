//! Append-only console log.

use std::fmt;

use chrono::{DateTime, Local};

/// One line in the console, stamped when it was appended.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// Local wall-clock time at append.
    pub timestamp: DateTime<Local>,
    /// Line text.
    pub text: String,
}

impl LogEntry {
    /// Stamp `text` with the current local time.
    pub fn now(text: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            text: text.into(),
        }
    }

    /// Timestamp formatted as `HH:MM:SS`.
    pub fn clock(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.clock(), self.text)
    }
}

/// Ordered, unbounded log. Only [`LogBuffer::clear`] removes entries.
#[derive(Debug, Clone, Default)]
pub struct LogBuffer {
    entries: Vec<LogEntry>,
}

impl LogBuffer {
    /// Append `text` stamped now and return the stored entry.
    pub fn push(&mut self, text: impl Into<String>) -> &LogEntry {
        self.entries.push(LogEntry::now(text));
        let last = self.entries.len() - 1;
        &self.entries[last]
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in append order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }
}

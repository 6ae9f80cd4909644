//! In-memory log of executed statements.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One executed statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SqlLogEntry {
    /// The SQL text.
    pub sql: String,
    /// Wall-clock execution time.
    pub duration: Duration,
    /// When execution started.
    pub executed_at: DateTime<Utc>,
}

/// Statements in execution order, oldest first.
#[derive(Debug, Clone, Default)]
pub struct SqlLog {
    entries: Vec<SqlLogEntry>,
}

impl SqlLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn push(&mut self, entry: SqlLogEntry) {
        self.entries.push(entry);
    }

    /// Returns the entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[SqlLogEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Keeps only the `leave_last` most recent entries.
    pub fn shrink(&mut self, leave_last: usize) {
        if self.entries.len() > leave_last {
            let excess = self.entries.len() - leave_last;
            self.entries.drain(..excess);
        }
    }
}

// src/stats/journal.rs
//! Bounded run journal

use crate::types::{LogEntry, LogKind};

/// Default number of informational entries kept per run
pub const DEFAULT_LOG_CAPACITY: usize = 10;

/// Append-only log of one run
///
/// Keeps the most recent `capacity` informational entries. Terminal entries
/// (success, stopped, failure) are never evicted so the outcome of a run
/// stays visible.
#[derive(Debug, Clone)]
pub struct Journal {
    capacity: usize,
    entries: Vec<LogEntry>,
}

impl Journal {
    /// Creates an empty journal
    pub fn new(capacity: usize) -> Self {
        Journal {
            capacity: capacity.max(1),
            entries: Vec::new(),
        }
    }

    /// Appends an entry, evicting the oldest informational entry if needed
    pub fn push(&mut self, entry: LogEntry) {
        let is_info = !entry.kind.is_terminal();
        self.entries.push(entry);

        if is_info && self.info_count() > self.capacity {
            if let Some(oldest) = self.entries.iter().position(|e| e.kind == LogKind::Info) {
                self.entries.remove(oldest);
            }
        }
    }

    /// Entries in append order
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    fn info_count(&self) -> usize {
        self.entries.iter().filter(|e| e.kind == LogKind::Info).count()
    }
}

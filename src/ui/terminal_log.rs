//! Bounded activity log shown in the terminal panel

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

/// Default number of entries retained
pub const DEFAULT_CAPACITY: usize = 1000;

/// Outcome class of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Success,
    Error,
    Info,
}

impl EntryKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            EntryKind::Success => "✓",
            EntryKind::Error => "✗",
            EntryKind::Info => "•",
        }
    }
}

/// One immutable line of the activity log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalEntry {
    pub text: String,
    pub kind: EntryKind,
    pub at: DateTime<Utc>,
}

impl TerminalEntry {
    /// Text with its kind prefix, e.g. `✓ Workspace deleted`
    pub fn display_line(&self) -> String {
        format!("{} {}", self.kind.prefix(), self.text)
    }
}

/// Append-only log with ring-buffer retention
#[derive(Debug)]
pub struct TerminalLog {
    entries: VecDeque<TerminalEntry>,
    capacity: usize,
    visible: bool,
}

impl Default for TerminalLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl TerminalLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity,
            visible: true,
        }
    }

    /// Append an entry, evicting the oldest one when full
    pub fn append(&mut self, text: impl Into<String>, kind: EntryKind) {
        let text = text.into();
        match kind {
            EntryKind::Success => tracing::info!(target: "activity", "{}", text),
            EntryKind::Error => tracing::warn!(target: "activity", "{}", text),
            EntryKind::Info => tracing::debug!(target: "activity", "{}", text),
        }

        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(TerminalEntry {
            text,
            kind,
            at: Utc::now(),
        });
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.append(text, EntryKind::Success);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.append(text, EntryKind::Error);
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.append(text, EntryKind::Info);
    }

    /// Entries in display order, most recent last
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &TerminalEntry> + ExactSizeIterator {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&TerminalEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of retained entries of the given kind
    pub fn count(&self, kind: EntryKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(TerminalEntry::display_line).collect()
    }

    /// Whether the terminal panel is shown
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn toggle_visible(&mut self) {
        self.visible = !self.visible;
    }
}

//! Command history with a movable recall cursor
//!
//! Entries are kept in send order. The cursor satisfies
//! `0 <= cursor <= len`; `cursor == len` is the fresh-input position
//! (not browsing).

/// Ordered log of sent commands for the current session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandHistory {
    entries: Vec<String>,
    cursor: usize,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sent command and return to the fresh-input position
    pub fn push(&mut self, command: impl Into<String>) {
        self.entries.push(command.into());
        self.cursor = self.entries.len();
    }

    /// Step towards older entries
    ///
    /// Returns the entry under the cursor, or `None` with no history.
    /// Clamped at the oldest entry.
    pub fn older(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        self.cursor = self.cursor.saturating_sub(1);
        tracing::debug!("history cursor -> {}", self.cursor);
        self.entries.get(self.cursor).map(String::as_str)
    }

    /// Step towards newer entries
    ///
    /// Returns the entry under the cursor, or `None` once the fresh-input
    /// position is reached (the caller leaves its input untouched).
    pub fn newer(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + 1).min(self.entries.len());
        tracing::debug!("history cursor -> {}", self.cursor);
        self.entries.get(self.cursor).map(String::as_str)
    }

    /// End a browsing session (any non-navigation edit)
    pub fn reset_cursor(&mut self) {
        self.cursor = self.entries.len();
    }

    /// Drop all entries; cursor returns to 0
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True while an older entry is recalled
    pub fn is_browsing(&self) -> bool {
        self.cursor < self.entries.len()
    }
}

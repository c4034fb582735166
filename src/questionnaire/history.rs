//! Bounded undo/redo log over questionnaire snapshots.

use serde::{Deserialize, Serialize};

use crate::questionnaire::state::Snapshot;

/// Default number of retained history entries.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Append-only snapshot arena with a cursor.
///
/// Whenever the arena is non-empty, `entries[cursor]` mirrors the current
/// content fields. Recording a mutation drops any redone-away tail first, so
/// history stays linear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryStack {
    #[serde(rename = "history", default)]
    entries: Vec<Snapshot>,
    #[serde(rename = "historyIndex", default)]
    cursor: usize,
    #[serde(skip, default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl HistoryStack {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Caps the arena size; at least one entry is always allowed.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(1);
        self.enforce_limit();
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        !self.entries.is_empty() && self.cursor + 1 < self.entries.len()
    }

    /// Records a content mutation: seeds the arena with the pre-mutation
    /// snapshot when empty, truncates the redo tail, then appends the
    /// post-mutation snapshot and advances the cursor.
    pub fn record(&mut self, before: Snapshot, after: Snapshot) {
        if self.entries.is_empty() {
            self.entries.push(before);
            self.cursor = 0;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(after);
        self.cursor = self.entries.len() - 1;
        self.enforce_limit();
    }

    /// Steps the cursor back and returns the snapshot to restore.
    pub fn undo(&mut self) -> Option<Snapshot> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor).cloned()
    }

    /// Steps the cursor forward and returns the snapshot to restore.
    pub fn redo(&mut self) -> Option<Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor).cloned()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    fn enforce_limit(&mut self) {
        while self.entries.len() > self.limit {
            self.entries.remove(0);
            self.cursor = self.cursor.saturating_sub(1);
        }
    }
}

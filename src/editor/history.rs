//! Linear undo/redo history.
//!
//! The history is an append-only log with a cursor. `push` truncates any
//! "future" entries past the cursor, appends, and FIFO-evicts the oldest
//! entry once the log exceeds its maximum size. `undo`/`redo` only move the
//! cursor and return the affected entry; applying the entry's inverse or
//! forward effect to the schematic is the caller's job (see
//! [`crate::editor::operations::apply_undo`]), which keeps the history
//! decoupled from the model's mutation API.
//!
//! Recording can be suspended so that programmatic replays (undo/redo
//! application, batch scopes) do not recurse into the log.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::model::{Component, Point, Schematic, Wire};

// ────────────────────────────────────────────────────────────────────────────
// Entries
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryKind {
    Create,
    Update,
    Delete,
    Batch,
}

/// The data needed to reverse or replay one recorded mutation.
///
/// Delete payloads keep `(original_index, element)` pairs so that undo can
/// reinsert elements at their original positions, preserving draw order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HistoryPayload {
    AddComponent {
        index: usize,
        component: Box<Component>,
    },
    AddWire {
        index: usize,
        wire: Box<Wire>,
    },
    MoveComponent {
        id: String,
        from: Point,
        to: Point,
    },
    RotateComponent {
        id: String,
        from: f64,
        to: f64,
    },
    UpdateComponent {
        id: String,
        before: Box<Component>,
        after: Box<Component>,
    },
    EditWirePoint {
        id: String,
        index: usize,
        from: Point,
        to: Point,
    },
    UpdateWireNet {
        id: String,
        before: Option<String>,
        after: Option<String>,
    },
    DeleteElements {
        components: Vec<(usize, Component)>,
        wires: Vec<(usize, Wire)>,
    },
    /// Whole-schematic snapshot pair, used by batch scopes.
    Snapshot {
        before: Box<Schematic>,
        after: Box<Schematic>,
    },
}

/// One recorded mutation. Immutable once appended; discarded only by FIFO
/// eviction or by truncation of the redo tail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub timestamp_ms: u64,
    pub description: String,
    pub kind: HistoryKind,
    pub payload: HistoryPayload,
}

impl HistoryEntry {
    pub fn new(kind: HistoryKind, description: impl Into<String>, payload: HistoryPayload) -> Self {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        HistoryEntry {
            id: Uuid::new_v4().to_string(),
            timestamp_ms,
            description: description.into(),
            kind,
            payload,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// History log
// ────────────────────────────────────────────────────────────────────────────

/// Append-only log with cursor.
///
/// # Example
///
/// ```rust,ignore
/// let mut history = History::new(100);
/// history.push(entry);
/// let undone = history.undo().cloned();   // entry at the cursor
/// apply_undo(&mut schematic, &undone.unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    /// Index of the entry undo would return next; `None` before the first.
    cursor: Option<usize>,
    recording: bool,
    max_size: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(crate::style::MAX_HISTORY)
    }
}

impl History {
    /// Create a history with the given maximum log depth.
    pub fn new(max_size: usize) -> Self {
        History {
            entries: Vec::new(),
            cursor: None,
            recording: true,
            max_size,
        }
    }

    /// Append an entry, discarding any redo tail first. Returns `false`
    /// (and drops the entry) while recording is suspended.
    pub fn push(&mut self, entry: HistoryEntry) -> bool {
        if !self.recording {
            return false;
        }
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.entries.truncate(keep);
        self.entries.push(entry);
        self.cursor = Some(self.entries.len() - 1);

        if self.entries.len() > self.max_size {
            self.entries.remove(0);
            self.cursor = self.cursor.and_then(|c| c.checked_sub(1));
        }
        true
    }

    /// Entry at the cursor, moving the cursor one step back. `None` when
    /// there is nothing to undo.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        let c = self.cursor?;
        self.cursor = c.checked_sub(1);
        self.entries.get(c)
    }

    /// Move the cursor one step forward and return the entry now at it.
    /// `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        let next = self.cursor.map_or(0, |c| c + 1);
        if next >= self.entries.len() {
            return None;
        }
        self.cursor = Some(next);
        self.entries.get(next)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.map_or(0, |c| c + 1) < self.entries.len()
    }

    /// Jump the cursor to `index`, returning that entry. Out-of-range leaves
    /// the cursor untouched and returns `None`.
    pub fn goto(&mut self, index: usize) -> Option<&HistoryEntry> {
        if index >= self.entries.len() {
            return None;
        }
        self.cursor = Some(index);
        self.entries.get(index)
    }

    /// Entry at the cursor, if any.
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.cursor?)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn start_recording(&mut self) {
        self.recording = true;
    }

    pub fn stop_recording(&mut self) {
        self.recording = false;
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// One line per entry, the cursor marked with an arrow.
    pub fn summary(&self) -> Vec<String> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let marker = if Some(i) == self.cursor { "→ " } else { "  " };
                format!("{marker}{}", e.description)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(description: &str) -> HistoryEntry {
        HistoryEntry::new(
            HistoryKind::Update,
            description,
            HistoryPayload::MoveComponent {
                id: "c1".to_string(),
                from: Point::new(0.0, 0.0),
                to: Point::new(10.0, 0.0),
            },
        )
    }

    #[test]
    fn test_empty_history() {
        let mut h = History::new(10);
        assert!(!h.can_undo());
        assert!(!h.can_redo());
        assert!(h.undo().is_none());
        assert!(h.redo().is_none());
        assert!(h.current().is_none());
    }

    #[test]
    fn test_push_undo_redo_cycle() {
        let mut h = History::new(10);
        h.push(entry("A"));
        h.push(entry("B"));
        assert!(h.can_undo());
        assert!(!h.can_redo());

        assert_eq!(h.undo().unwrap().description, "B");
        assert!(h.can_redo());
        assert_eq!(h.undo().unwrap().description, "A");
        assert!(!h.can_undo());
        assert!(h.undo().is_none());

        assert_eq!(h.redo().unwrap().description, "A");
        assert_eq!(h.redo().unwrap().description, "B");
        assert!(h.redo().is_none());
    }

    #[test]
    fn test_push_after_undo_discards_redo_tail() {
        let mut h = History::new(10);
        h.push(entry("A"));
        h.push(entry("B"));
        let _ = h.undo();
        h.push(entry("C"));
        // B is gone irrecoverably.
        assert_eq!(h.len(), 2);
        assert!(!h.can_redo());
        assert_eq!(h.current().unwrap().description, "C");
        assert_eq!(h.undo().unwrap().description, "C");
        assert_eq!(h.undo().unwrap().description, "A");
    }

    #[test]
    fn test_can_redo_false_after_plain_push() {
        let mut h = History::new(10);
        h.push(entry("A"));
        assert!(!h.can_redo());
    }

    #[test]
    fn test_fifo_eviction_compensates_cursor() {
        let mut h = History::new(2);
        h.push(entry("A"));
        h.push(entry("B"));
        h.push(entry("C"));
        assert_eq!(h.len(), 2);
        // Oldest entry was evicted; undo still walks C then B.
        assert_eq!(h.undo().unwrap().description, "C");
        assert_eq!(h.undo().unwrap().description, "B");
        assert!(h.undo().is_none());
    }

    #[test]
    fn test_recording_suspension() {
        let mut h = History::new(10);
        h.stop_recording();
        assert!(!h.push(entry("ignored")));
        assert!(h.is_empty());
        h.start_recording();
        assert!(h.push(entry("kept")));
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn test_goto() {
        let mut h = History::new(10);
        h.push(entry("A"));
        h.push(entry("B"));
        h.push(entry("C"));
        assert_eq!(h.goto(0).unwrap().description, "A");
        assert!(h.can_redo());
        assert!(h.goto(7).is_none());
        // Out-of-range goto left the cursor alone.
        assert_eq!(h.current().unwrap().description, "A");
    }

    #[test]
    fn test_summary_marks_cursor() {
        let mut h = History::new(10);
        h.push(entry("A"));
        h.push(entry("B"));
        let _ = h.undo();
        let lines = h.summary();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("→ "));
        assert!(lines[1].starts_with("  "));
    }
}

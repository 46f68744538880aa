use std::sync::Arc;

use log::debug;

use crate::error::HistoryError;

/// Immutable serialized copy of the document at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot(Arc<str>);

impl Snapshot {
    pub fn new(state: impl Into<Arc<str>>) -> Self {
        Self(state.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Linear undo/redo history of full snapshots.
///
/// The snapshot under the cursor is always the content currently shown.
/// Recording a new snapshot drops everything after the cursor, so there is
/// never more than one redo branch.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Snapshot>,
    cursor: usize,
}

impl History {
    /// History seeded with the initial state
    pub fn new(initial: Snapshot) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
        }
    }

    /// Records a committed state
    pub fn snapshot(&mut self, state: Snapshot) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(state);
        self.cursor = self.snapshots.len() - 1;
        debug!("📸 History now at {}/{}", self.cursor, self.snapshots.len() - 1);
    }

    pub fn undo(&mut self) -> Result<&Snapshot, HistoryError> {
        if self.cursor == 0 {
            return Err(HistoryError::AtHistoryStart);
        }
        self.cursor -= 1;
        debug!("↩️ Undo to {}", self.cursor);
        Ok(&self.snapshots[self.cursor])
    }

    pub fn redo(&mut self) -> Result<&Snapshot, HistoryError> {
        if self.cursor + 1 >= self.snapshots.len() {
            return Err(HistoryError::AtHistoryEnd);
        }
        self.cursor += 1;
        debug!("↪️ Redo to {}", self.cursor);
        Ok(&self.snapshots[self.cursor])
    }

    pub fn current(&self) -> &Snapshot {
        &self.snapshots[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }
}

use serde::{Deserialize, Serialize};

use crate::element::ObjectId;

/// Hands out object ids for one editor session.
///
/// The counter only ever moves forward, so an id is never reused within a
/// session even after undo brings back an older document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdGenerator {
    next: u64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdGenerator {
    pub fn generate_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next);
        self.next += 1;
        id
    }

    /// Never moves backwards
    pub fn advance_past(&mut self, other: &IdGenerator) {
        self.next = self.next.max(other.next);
    }
}

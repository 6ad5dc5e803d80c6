use std::collections::BTreeSet;

use crate::model::Position;

/// Positions currently chosen in the active container. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    positions: BTreeSet<Position>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `pos` if absent, remove it otherwise. Returns whether it is now selected.
    pub fn toggle(&mut self, pos: Position) -> bool {
        if self.positions.remove(&pos) {
            false
        } else {
            self.positions.insert(pos);
            true
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.positions.contains(&pos)
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// The single selected position, when exactly one is chosen (edit mode)
    pub fn single(&self) -> Option<Position> {
        match self.positions.len() {
            1 => self.positions.first().copied(),
            _ => None,
        }
    }

    pub fn positions(&self) -> &BTreeSet<Position> {
        &self.positions
    }
}

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::model::{Position, Sample};

/// A storage box with a fixed `rows` x `cols` grid of positions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Container {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rows: u32,
    #[serde(default)]
    pub cols: u32,
    /// Square edge length written by early versions instead of rows/cols
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(default, alias = "vials", deserialize_with = "lenient_slots")]
    pub slots: BTreeMap<Position, Sample>,
}

/// Reads a slot map record by record. A record whose key is not a position,
/// or whose body is not a sample, is dropped on its own so the rest of the
/// container survives.
fn lenient_slots<'de, D>(deserializer: D) -> Result<BTreeMap<Position, Sample>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, serde_json::Value>>::deserialize(deserializer)?;
    let mut slots = BTreeMap::new();
    for (key, value) in raw.unwrap_or_default() {
        let pos = match key.parse::<Position>() {
            Ok(pos) => pos,
            Err(e) => {
                log::warn!("Dropping slot record: {}", e);
                continue;
            }
        };
        match serde_json::from_value::<Sample>(value) {
            Ok(sample) => {
                slots.insert(pos, sample);
            }
            Err(e) => log::warn!("Dropping unreadable slot record at {}: {}", pos, e),
        }
    }
    Ok(slots)
}

impl Container {
    pub fn new(name: String, rows: u32, cols: u32) -> Self {
        Self {
            name,
            rows,
            cols,
            size: None,
            slots: BTreeMap::new(),
        }
    }

    pub fn has_valid_grid(&self) -> bool {
        self.rows > 0 && self.cols > 0
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row >= 1 && pos.row <= self.rows && pos.col >= 1 && pos.col <= self.cols
    }

    pub fn capacity(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// The occupant of `pos`, ignoring records without a name
    pub fn sample_at(&self, pos: Position) -> Option<&Sample> {
        self.slots.get(&pos).filter(|s| s.is_occupied())
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        self.sample_at(pos).is_some()
    }

    /// Occupied positions in row-major order
    pub fn occupied(&self) -> impl Iterator<Item = (Position, &Sample)> + '_ {
        self.slots
            .iter()
            .filter(|(_, s)| s.is_occupied())
            .map(|(pos, s)| (*pos, s))
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied().count()
    }

    /// Every grid position in row-major order with its occupant, if any
    pub fn cells(&self) -> impl Iterator<Item = (Position, Option<&Sample>)> + '_ {
        (1..=self.rows).flat_map(move |row| {
            (1..=self.cols).map(move |col| {
                let pos = Position::new(row, col);
                (pos, self.sample_at(pos))
            })
        })
    }

    /// One-time migration of legacy records. Fills whichever of `rows`/`cols`
    /// is missing from the square `size` field, drops slot records that have
    /// no name and, once the grid is usable, drops records outside it.
    /// Returns whether anything changed; running it again is a no-op.
    pub fn normalize_legacy(&mut self) -> bool {
        let mut changed = false;

        if let Some(size) = self.size.filter(|&size| size > 0) {
            if self.rows == 0 {
                self.rows = size;
                changed = true;
            }
            if self.cols == 0 {
                self.cols = size;
                changed = true;
            }
        }

        let before = self.slots.len();
        self.slots.retain(|_, sample| sample.is_occupied());
        changed |= self.slots.len() != before;

        if self.has_valid_grid() {
            let (rows, cols) = (self.rows, self.cols);
            let name = &self.name;
            let before = self.slots.len();
            self.slots.retain(|pos, sample| {
                let inside = pos.row <= rows && pos.col <= cols;
                if !inside {
                    log::warn!(
                        "Dropping '{}' at {}, outside the {}x{} grid of '{}'",
                        sample.name,
                        pos,
                        rows,
                        cols,
                        name
                    );
                }
                inside
            });
            changed |= self.slots.len() != before;
        }

        changed
    }
}

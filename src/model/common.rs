use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub type Id = String;

/// A 1-based (row, column) address inside a container grid.
///
/// Serialized as the `"<row>-<col>"` key used by the persisted slot maps.
/// Ordering is row-major, which is the order grids are scanned in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, SerializeDisplay, DeserializeFromStr,
)]
pub struct Position {
    pub row: u32,
    pub col: u32,
}

impl Position {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Slot key form, e.g. `"3-12"`
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.col)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPosition(pub String);

impl fmt::Display for InvalidPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid position key '{}', expected '<row>-<col>'", self.0)
    }
}

impl std::error::Error for InvalidPosition {}

impl FromStr for Position {
    type Err = InvalidPosition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidPosition(s.to_string());
        let (row, col) = s.split_once('-').ok_or_else(invalid)?;
        let row = parse_index(row).ok_or_else(invalid)?;
        let col = parse_index(col).ok_or_else(invalid)?;
        Ok(Self { row, col })
    }
}

/// A positive index written in canonical form: digits only, no leading zero.
/// Keeps every position to exactly one key string.
fn parse_index(part: &str) -> Option<u32> {
    if part.is_empty() || part.starts_with('0') || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Fresh container id. UUIDv7 is time-ordered, so ids sort in creation order.
pub fn generate_container_id() -> Id {
    format!("box_{}", Uuid::now_v7().simple())
}

//! Grid cell identity.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A cell on the (unbounded) grid of one floor.
///
/// Ordered by row, then column. Serialized as `"row,col"` so it can be used
/// as a JSON object key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub row: i32,
    pub col: i32,
}

impl CellKey {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The cell offset by `(d_row, d_col)`, or `None` past the `i32` range.
    pub const fn offset(self, d_row: i32, d_col: i32) -> Option<Self> {
        match (self.row.checked_add(d_row), self.col.checked_add(d_col)) {
            (Some(row), Some(col)) => Some(Self { row, col }),
            _ => None,
        }
    }

    /// Neighbor one row up.
    pub const fn north(self) -> Option<Self> {
        self.offset(-1, 0)
    }

    /// Neighbor one row down.
    pub const fn south(self) -> Option<Self> {
        self.offset(1, 0)
    }

    /// Neighbor one column right.
    pub const fn east(self) -> Option<Self> {
        self.offset(0, 1)
    }

    /// Neighbor one column left.
    pub const fn west(self) -> Option<Self> {
        self.offset(0, -1)
    }
}

impl From<(i32, i32)> for CellKey {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

/// Error returned when a `"row,col"` string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid cell key: {0:?}")]
pub struct ParseCellKeyError(pub String);

impl FromStr for CellKey {
    type Err = ParseCellKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCellKeyError(s.to_string());
        let (row, col) = s.split_once(',').ok_or_else(err)?;
        let row = row.trim().parse().map_err(|_| err())?;
        let col = col.trim().parse().map_err(|_| err())?;
        Ok(Self { row, col })
    }
}

impl Serialize for CellKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CellKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

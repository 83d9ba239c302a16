//! Grid positions.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// A position on the board, addressed `(row, col)` from the top-left corner.
///
/// Coordinates are plain values with structural equality; bounds are a
/// property of the board they are used against, not of the coordinate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize,
)]
#[display("{row},{col}")]
pub struct Coordinate {
    /// Row index, 0-based from the top.
    pub row: usize,
    /// Column index, 0-based from the left.
    pub col: usize,
}

impl Coordinate {
    /// Creates a coordinate.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

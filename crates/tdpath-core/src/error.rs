//! Error type for grid construction and mutation.

use thiserror::Error;

use crate::geom::Coord;

/// Errors raised by [`GridMap`](crate::GridMap) construction, mutation and
/// ASCII parsing.
///
/// An unreachable goal is never reported through this type; searches
/// signal it with an empty path instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// The grid would have no cells, or more cells than can be addressed.
    #[error("invalid grid dimensions {rows}x{cols}")]
    InvalidDimensions { rows: i32, cols: i32 },

    /// A coordinate outside the grid was used where an in-bounds one is required.
    #[error("coordinate {coord} is outside the {rows}x{cols} grid")]
    OutOfBounds { coord: Coord, rows: i32, cols: i32 },

    /// An ASCII grid has rows of different widths.
    #[error("grid row {row} has {found} cells, expected {expected}")]
    InconsistentRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// An ASCII grid contains a character other than `O` or `.`.
    #[error("invalid cell \u{201c}{ch}\u{201d} at {coord}")]
    InvalidCell { ch: char, coord: Coord },
}

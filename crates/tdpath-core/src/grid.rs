//! The [`GridMap`] type, a fixed-size boolean occupancy grid.
//!
//! Every cell starts unblocked. Anything outside the grid is reported as
//! blocked, so searches never need their own bounds checks.

use std::fmt;

use crate::error::GridError;
use crate::geom::{Coord, Range};

const BLOCKED_CHAR: char = 'O';
const OPEN_CHAR: char = '.';

/// A `rows × cols` occupancy grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMap {
    bounds: Range,
    cells: Vec<bool>,
}

impl GridMap {
    /// Create a new grid with all cells unblocked.
    ///
    /// Fails with [`GridError::InvalidDimensions`] when either dimension is
    /// not positive or the cell count overflows.
    pub fn new(rows: i32, cols: i32) -> Result<Self, GridError> {
        if rows <= 0 || cols <= 0 {
            return Err(GridError::InvalidDimensions { rows, cols });
        }
        let len = (rows as usize)
            .checked_mul(cols as usize)
            .ok_or(GridError::InvalidDimensions { rows, cols })?;
        Ok(Self {
            bounds: Range::sized(rows, cols),
            cells: vec![false; len],
        })
    }

    /// Parse a grid from its ASCII dump: one line per row, `O` for a
    /// blocked cell and `.` for an open one.
    ///
    /// Leading and trailing whitespace around the whole text is ignored, as
    /// is trailing whitespace on each line.
    pub fn from_ascii(s: &str) -> Result<Self, GridError> {
        let lines: Vec<&str> = s.trim().lines().map(str::trim_end).collect();
        let cols = lines.first().map_or(0, |l| l.chars().count());
        let mut grid = Self::new(lines.len() as i32, cols as i32)?;
        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != cols {
                return Err(GridError::InconsistentRow {
                    row,
                    expected: cols,
                    found,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                let coord = Coord::new(row as i32, col as i32);
                match ch {
                    BLOCKED_CHAR => {
                        grid.set_blocked(coord, true)?;
                    }
                    OPEN_CHAR => {}
                    _ => return Err(GridError::InvalidCell { ch, coord }),
                }
            }
        }
        Ok(grid)
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> i32 {
        self.bounds.rows()
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> i32 {
        self.bounds.cols()
    }

    /// The rectangle covered by this grid.
    #[inline]
    pub fn range(&self) -> Range {
        self.bounds
    }

    /// Whether `c` lies inside the grid.
    #[inline]
    pub fn contains(&self, c: Coord) -> bool {
        self.bounds.contains(c)
    }

    /// Set or clear the blocked flag at `c`.
    ///
    /// Returns whether the flag actually changed, or
    /// [`GridError::OutOfBounds`] if `c` is outside the grid.
    pub fn set_blocked(&mut self, c: Coord, blocked: bool) -> Result<bool, GridError> {
        let i = self.checked_index(c)?;
        let changed = self.cells[i] != blocked;
        self.cells[i] = blocked;
        Ok(changed)
    }

    /// Whether `c` is blocked. Out-of-bounds cells are always blocked.
    #[inline]
    pub fn is_blocked(&self, c: Coord) -> bool {
        self.bounds.index(c).is_none_or(|i| self.cells[i])
    }

    /// Cost of moving from `a` to `b`: their Euclidean distance.
    #[inline]
    pub fn move_cost(&self, a: Coord, b: Coord) -> f64 {
        a.distance(b)
    }

    /// Append the in-bounds, unblocked orthogonal neighbours of `c` into
    /// `buf`, in the order north, west, east, south. The caller clears `buf`.
    pub fn successors_into(&self, c: Coord, buf: &mut Vec<Coord>) {
        buf.extend(c.neighbors_4().into_iter().filter(|&n| !self.is_blocked(n)));
    }

    /// The in-bounds, unblocked orthogonal neighbours of `c`.
    pub fn successors(&self, c: Coord) -> Vec<Coord> {
        let mut buf = Vec::with_capacity(4);
        self.successors_into(c, &mut buf);
        buf
    }

    /// Row-major iterator over the blocked cells.
    pub fn blocked(&self) -> impl Iterator<Item = Coord> + '_ {
        self.bounds
            .iter()
            .zip(self.cells.iter())
            .filter_map(|(c, &b)| b.then_some(c))
    }

    /// Number of blocked cells.
    pub fn blocked_count(&self) -> usize {
        self.cells.iter().filter(|&&b| b).count()
    }

    /// Print the ASCII dump to stdout.
    pub fn print_grid(&self) {
        print!("{self}");
    }

    /// [`GridError::OutOfBounds`] unless `c` lies inside the grid.
    pub fn ensure_contains(&self, c: Coord) -> Result<(), GridError> {
        self.checked_index(c).map(|_| ())
    }

    fn checked_index(&self, c: Coord) -> Result<usize, GridError> {
        self.bounds.index(c).ok_or(GridError::OutOfBounds {
            coord: c,
            rows: self.rows(),
            cols: self.cols(),
        })
    }
}

impl fmt::Display for GridMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &b) in self.cells.iter().enumerate() {
            let ch = if b { BLOCKED_CHAR } else { OPEN_CHAR };
            write!(f, "{ch}")?;
            if (i + 1) % self.cols() as usize == 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// serde: dimensions plus the blocked cells
// ---------------------------------------------------------------------------

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct GridMapRepr {
    rows: i32,
    cols: i32,
    blocked: Vec<Coord>,
}

#[cfg(feature = "serde")]
impl serde::Serialize for GridMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        GridMapRepr {
            rows: self.rows(),
            cols: self.cols(),
            blocked: self.blocked().collect(),
        }
        .serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for GridMap {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let repr = GridMapRepr::deserialize(deserializer)?;
        let mut grid = GridMap::new(repr.rows, repr.cols).map_err(D::Error::custom)?;
        for c in repr.blocked {
            grid.set_blocked(c, true).map_err(D::Error::custom)?;
        }
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = "\
.OO.
..O.
....";

    #[test]
    fn new_grid_is_open() {
        let g = GridMap::new(3, 4).unwrap();
        assert_eq!(g.rows(), 3);
        assert_eq!(g.cols(), 4);
        assert_eq!(g.blocked_count(), 0);
        assert!(g.range().iter().all(|c| !g.is_blocked(c)));
    }

    #[test]
    fn invalid_dimensions_fail() {
        assert_eq!(
            GridMap::new(0, 4),
            Err(GridError::InvalidDimensions { rows: 0, cols: 4 })
        );
        assert!(GridMap::new(3, -1).is_err());
    }

    #[test]
    fn set_and_clear_blocked() {
        let mut g = GridMap::new(3, 3).unwrap();
        let c = Coord::new(1, 2);
        assert_eq!(g.set_blocked(c, true), Ok(true));
        assert!(g.is_blocked(c));
        assert_eq!(g.set_blocked(c, true), Ok(false));
        assert_eq!(g.set_blocked(c, false), Ok(true));
        assert!(!g.is_blocked(c));
    }

    #[test]
    fn out_of_bounds_is_blocked() {
        let g = GridMap::new(2, 2).unwrap();
        assert!(g.is_blocked(Coord::new(-1, 0)));
        assert!(g.is_blocked(Coord::new(0, -1)));
        assert!(g.is_blocked(Coord::new(2, 0)));
        assert!(g.is_blocked(Coord::new(0, 2)));
    }

    #[test]
    fn out_of_bounds_mutation_fails() {
        let mut g = GridMap::new(2, 2).unwrap();
        assert_eq!(
            g.set_blocked(Coord::new(2, 0), true),
            Err(GridError::OutOfBounds {
                coord: Coord::new(2, 0),
                rows: 2,
                cols: 2,
            })
        );
        assert_eq!(g.blocked_count(), 0);
    }

    #[test]
    fn successors_skip_blocked_and_edges() {
        let g = GridMap::from_ascii(FIXTURE).unwrap();
        // (0,0): north and west are off-grid, east (0,1) blocked.
        assert_eq!(g.successors(Coord::new(0, 0)), vec![Coord::new(1, 0)]);
        // (1,1): north (0,1) and east (1,2) blocked.
        assert_eq!(
            g.successors(Coord::new(1, 1)),
            vec![Coord::new(1, 0), Coord::new(2, 1)]
        );
        // (2,3): bottom-right corner.
        assert_eq!(
            g.successors(Coord::new(2, 3)),
            vec![Coord::new(1, 3), Coord::new(2, 2)]
        );
    }

    #[test]
    fn successors_far_outside_grid_are_empty() {
        let g = GridMap::new(4, 4).unwrap();
        for c in [
            Coord::new(i32::MAX, 0),
            Coord::new(0, i32::MAX),
            Coord::new(i32::MIN, i32::MIN),
            Coord::new(-5, 2),
        ] {
            assert!(g.successors(c).is_empty(), "successors of {c}");
        }
        // One step off the edge still sees the grid.
        assert_eq!(g.successors(Coord::new(-1, 2)), vec![Coord::new(0, 2)]);
    }

    #[test]
    fn move_cost_is_euclidean() {
        let g = GridMap::new(8, 8).unwrap();
        assert_eq!(g.move_cost(Coord::new(0, 0), Coord::new(0, 1)), 1.0);
        assert_eq!(g.move_cost(Coord::new(1, 1), Coord::new(4, 5)), 5.0);
    }

    #[test]
    fn ascii_round_trip() {
        let g = GridMap::from_ascii(FIXTURE).unwrap();
        assert_eq!(g.blocked_count(), 3);
        assert_eq!(
            g.blocked().collect::<Vec<_>>(),
            vec![Coord::new(0, 1), Coord::new(0, 2), Coord::new(1, 2)]
        );
        assert_eq!(g.to_string(), format!("{FIXTURE}\n"));
    }

    #[test]
    fn ascii_rejects_bad_input() {
        assert_eq!(
            GridMap::from_ascii("..\n...").unwrap_err(),
            GridError::InconsistentRow {
                row: 1,
                expected: 2,
                found: 3,
            }
        );
        assert_eq!(
            GridMap::from_ascii("..\n.#").unwrap_err(),
            GridError::InvalidCell {
                ch: '#',
                coord: Coord::new(1, 1),
            }
        );
        assert!(GridMap::from_ascii("").is_err());
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn gridmap_round_trip() {
        let g = GridMap::from_ascii("O..\n.O.\n..O").unwrap();
        let json = serde_json::to_string(&g).unwrap();
        let back: GridMap = serde_json::from_str(&json).unwrap();
        assert_eq!(g, back);
    }

    #[test]
    fn gridmap_rejects_out_of_bounds_blocked_cell() {
        let json = r#"{"rows":2,"cols":2,"blocked":[{"row":5,"col":0}]}"#;
        assert!(serde_json::from_str::<GridMap>(json).is_err());
    }

    #[test]
    fn coord_round_trip() {
        let c = Coord::new(3, 7);
        let json = serde_json::to_string(&c).unwrap();
        let back: Coord = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }
}

//! [`GridPath`]: an occupancy grid plus a cached "next step toward the
//! goal" index.
//!
//! The cache maps a cell to the cell after it on a cheapest route to the
//! goal. It fills lazily, one whole route per miss, and is wiped in full by
//! every grid or goal change. Because the grid can only be mutated through
//! `GridPath`, the two can never drift apart.

use std::collections::HashMap;

use tdpath_core::{Coord, GridError, GridMap};

use crate::astar::PathFinder;

/// Outcome of [`GridPath::try_place`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The footprint is now blocked and every source still reaches the goal.
    Placed,
    /// This footprint cell was already blocked; nothing changed.
    Occupied(Coord),
    /// Blocking the footprint would cut this source off from the goal; the
    /// footprint was unblocked again.
    SealsPath(Coord),
}

impl Placement {
    /// Whether the footprint was placed.
    #[inline]
    pub fn is_placed(self) -> bool {
        self == Placement::Placed
    }
}

/// A grid with a single goal and a cache of next steps toward it.
#[derive(Debug, Clone)]
pub struct GridPath {
    map: GridMap,
    goal: Coord,
    cache: HashMap<Coord, Coord>,
}

impl GridPath {
    /// Create an open `rows × cols` grid routing toward `goal`.
    pub fn new(rows: i32, cols: i32, goal: Coord) -> Result<Self, GridError> {
        Self::with_map(GridMap::new(rows, cols)?, goal)
    }

    /// Route toward `goal` over an existing grid.
    pub fn with_map(map: GridMap, goal: Coord) -> Result<Self, GridError> {
        map.ensure_contains(goal)?;
        Ok(Self {
            map,
            goal,
            cache: HashMap::new(),
        })
    }

    /// The underlying grid. Mutate it through [`set_blocked`](Self::set_blocked).
    #[inline]
    pub fn grid(&self) -> &GridMap {
        &self.map
    }

    /// The current goal.
    #[inline]
    pub fn goal(&self) -> Coord {
        self.goal
    }

    /// Whether `c` is blocked (out-of-bounds cells always are).
    #[inline]
    pub fn is_blocked(&self, c: Coord) -> bool {
        self.map.is_blocked(c)
    }

    /// Number of cached next steps.
    #[inline]
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Change the goal. The cache is cleared.
    pub fn set_goal(&mut self, goal: Coord) -> Result<(), GridError> {
        self.map.ensure_contains(goal)?;
        self.goal = goal;
        self.invalidate();
        Ok(())
    }

    /// Set or clear the blocked flag at `c`. On success the cache is cleared,
    /// whether or not the flag actually changed.
    pub fn set_blocked(&mut self, c: Coord, blocked: bool) -> Result<bool, GridError> {
        let changed = self.map.set_blocked(c, blocked)?;
        self.invalidate();
        Ok(changed)
    }

    /// The next cell to step to from `c` toward the goal.
    ///
    /// The goal maps to itself. Returns `None` when the goal cannot be
    /// reached from `c` or `c` is outside the grid.
    pub fn get_next(&mut self, c: Coord) -> Option<Coord> {
        if let Some(&next) = self.cache.get(&c) {
            return Some(next);
        }
        if !self.map.contains(c) {
            return None;
        }
        self.compute_path(c);
        self.cache.get(&c).copied()
    }

    /// The full route from `c` to the goal, both ends included, or an empty
    /// `Vec` when there is none. The cache is filled along the route.
    pub fn path_from(&mut self, c: Coord) -> Vec<Coord> {
        if !self.map.contains(c) {
            return Vec::new();
        }
        if self.cache.contains_key(&c) {
            return self.cached_route(c);
        }
        self.compute_path(c)
    }

    /// Block every cell of `footprint`, unless one is already blocked or the
    /// result would leave some cell of `sources` without a route to the goal.
    ///
    /// Out-of-bounds footprint cells are an error and leave the grid
    /// unchanged. A rejected placement is a normal outcome, reported through
    /// [`Placement`].
    pub fn try_place(
        &mut self,
        footprint: &[Coord],
        sources: &[Coord],
    ) -> Result<Placement, GridError> {
        for &c in footprint {
            self.map.ensure_contains(c)?;
        }
        if let Some(&c) = footprint.iter().find(|&&c| self.map.is_blocked(c)) {
            log::debug!("placement rejected: {c} is occupied");
            return Ok(Placement::Occupied(c));
        }

        for &c in footprint {
            self.map.set_blocked(c, true)?;
        }
        self.invalidate();

        if let Some(&source) = sources.iter().find(|&&s| self.get_next(s).is_none()) {
            log::debug!("placement rejected: it would cut {source} off from {}", self.goal);
            self.remove(footprint)?;
            return Ok(Placement::SealsPath(source));
        }
        Ok(Placement::Placed)
    }

    /// Unblock every cell of `footprint`. The cache is cleared.
    pub fn remove(&mut self, footprint: &[Coord]) -> Result<(), GridError> {
        for &c in footprint {
            self.map.ensure_contains(c)?;
        }
        for &c in footprint {
            self.map.set_blocked(c, false)?;
        }
        self.invalidate();
        Ok(())
    }

    /// Drop every cached step.
    pub fn invalidate(&mut self) {
        if !self.cache.is_empty() {
            log::debug!("path cache: dropping {} entries", self.cache.len());
        }
        self.cache.clear();
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Search from `c` to the goal and cache every step of the route.
    fn compute_path(&mut self, c: Coord) -> Vec<Coord> {
        log::debug!("path cache miss at {c}, searching toward {}", self.goal);
        let path = PathFinder::new(&self.map).compute_path(c, self.goal);
        if path.is_empty() {
            log::debug!("no route from {c} to {}", self.goal);
            return path;
        }
        for w in path.windows(2) {
            self.cache.insert(w[0], w[1]);
        }
        if let Some(&last) = path.last() {
            self.cache.insert(last, last);
        }
        path
    }

    /// Follow cached steps from `c` until the goal.
    fn cached_route(&self, c: Coord) -> Vec<Coord> {
        let mut route = vec![c];
        let mut cur = c;
        while let Some(&next) = self.cache.get(&cur) {
            if next == cur {
                break;
            }
            route.push(next);
            cur = next;
        }
        route
    }
}

// ---------------------------------------------------------------------------
// serde: grid and goal only, the cache starts empty
// ---------------------------------------------------------------------------

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct GridPathRepr {
    grid: GridMap,
    goal: Coord,
}

#[cfg(feature = "serde")]
impl serde::Serialize for GridPath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        GridPathRepr {
            grid: self.map.clone(),
            goal: self.goal,
        }
        .serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for GridPath {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let repr = GridPathRepr::deserialize(deserializer)?;
        GridPath::with_map(repr.grid, repr.goal).map_err(D::Error::custom)
    }
}

use std::hash::Hash;
use std::marker::PhantomData;

use tdpath_core::{Coord, GridMap};

/// Minimal pathfinding interface: successor enumeration only.
pub trait Pather {
    /// The graph's point type. Identity is by `Eq`/`Hash` only.
    type Point: Copy + Eq + Hash;

    /// Append successors of `p` into `buf`. The caller clears `buf` before calling.
    fn neighbors(&self, p: Self::Point, buf: &mut Vec<Self::Point>);
}

/// Pather with weighted (non-negative) edges.
pub trait WeightedPather: Pather {
    /// Cost of moving from `from` to adjacent `to`.
    fn cost(&self, from: Self::Point, to: Self::Point) -> f64;
}

/// Full A* pather with a heuristic estimate to the goal.
pub trait AstarPather: WeightedPather {
    /// Heuristic estimate of the cost from `from` to `to`.
    /// Must be consistent: closed nodes are never reopened.
    fn estimate(&self, from: Self::Point, to: Self::Point) -> f64;
}

impl<T: Pather + ?Sized> Pather for &T {
    type Point = T::Point;

    #[inline]
    fn neighbors(&self, p: Self::Point, buf: &mut Vec<Self::Point>) {
        (**self).neighbors(p, buf);
    }
}

impl<T: WeightedPather + ?Sized> WeightedPather for &T {
    #[inline]
    fn cost(&self, from: Self::Point, to: Self::Point) -> f64 {
        (**self).cost(from, to)
    }
}

impl<T: AstarPather + ?Sized> AstarPather for &T {
    #[inline]
    fn estimate(&self, from: Self::Point, to: Self::Point) -> f64 {
        (**self).estimate(from, to)
    }
}

// ---------------------------------------------------------------------------
// GridMap: 4-way successors, Euclidean cost reused as the heuristic
// ---------------------------------------------------------------------------

impl Pather for GridMap {
    type Point = Coord;

    #[inline]
    fn neighbors(&self, p: Coord, buf: &mut Vec<Coord>) {
        self.successors_into(p, buf);
    }
}

impl WeightedPather for GridMap {
    #[inline]
    fn cost(&self, from: Coord, to: Coord) -> f64 {
        self.move_cost(from, to)
    }
}

impl AstarPather for GridMap {
    #[inline]
    fn estimate(&self, from: Coord, to: Coord) -> f64 {
        self.move_cost(from, to)
    }
}

// ---------------------------------------------------------------------------
// FnPather
// ---------------------------------------------------------------------------

/// An [`AstarPather`] assembled from three closures, for graphs that have
/// no type of their own.
///
/// ```
/// use tdpath_paths::{FnPather, PathFinder};
///
/// // A line of integers where each step costs 1.
/// let line = FnPather::new(
///     |p: i64| vec![p - 1, p + 1],
///     |a: i64, b: i64| (a - b).abs() as f64,
///     |a: i64, b: i64| (a - b).abs() as f64,
/// );
/// let path = PathFinder::new(line).compute_path(2, 5);
/// assert_eq!(path, vec![2, 3, 4, 5]);
/// ```
pub struct FnPather<P, S, C, H> {
    successors: S,
    move_cost: C,
    heuristic: H,
    _point: PhantomData<fn(P) -> P>,
}

impl<P, S, C, H> FnPather<P, S, C, H>
where
    P: Copy + Eq + Hash,
    S: Fn(P) -> Vec<P>,
    C: Fn(P, P) -> f64,
    H: Fn(P, P) -> f64,
{
    /// Wrap the successor, move-cost and heuristic functions.
    pub fn new(successors: S, move_cost: C, heuristic: H) -> Self {
        Self {
            successors,
            move_cost,
            heuristic,
            _point: PhantomData,
        }
    }
}

impl<P, S, C, H> Pather for FnPather<P, S, C, H>
where
    P: Copy + Eq + Hash,
    S: Fn(P) -> Vec<P>,
{
    type Point = P;

    fn neighbors(&self, p: P, buf: &mut Vec<P>) {
        buf.extend((self.successors)(p));
    }
}

impl<P, S, C, H> WeightedPather for FnPather<P, S, C, H>
where
    P: Copy + Eq + Hash,
    S: Fn(P) -> Vec<P>,
    C: Fn(P, P) -> f64,
{
    fn cost(&self, from: P, to: P) -> f64 {
        (self.move_cost)(from, to)
    }
}

impl<P, S, C, H> AstarPather for FnPather<P, S, C, H>
where
    P: Copy + Eq + Hash,
    S: Fn(P) -> Vec<P>,
    C: Fn(P, P) -> f64,
    H: Fn(P, P) -> f64,
{
    fn estimate(&self, from: P, to: P) -> f64 {
        (self.heuristic)(from, to)
    }
}

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::pqset::{Keyed, PriorityQueueSet};
use crate::traits::AstarPather;

// ---------------------------------------------------------------------------
// Internal node for the open set
// ---------------------------------------------------------------------------

/// A search node. Its identity is the point alone; costs only matter for
/// ordering, which is done by [`Node::by_f_cost`].
#[derive(Clone, Copy, Debug)]
pub(crate) struct Node<P> {
    pub(crate) point: P,
    pub(crate) g: f64,
    pub(crate) f: f64,
    /// Index of the predecessor in the search's closed-node arena.
    pub(crate) parent: Option<usize>,
}

impl<P: Copy + Eq + std::hash::Hash> Keyed for Node<P> {
    type Key = P;

    #[inline]
    fn key(&self) -> P {
        self.point
    }
}

impl<P> Node<P> {
    #[inline]
    pub(crate) fn by_f_cost(a: &Self, b: &Self) -> Ordering {
        a.f.total_cmp(&b.f)
    }
}

// ---------------------------------------------------------------------------
// PathFinder
// ---------------------------------------------------------------------------

/// A* search over any graph described by an [`AstarPather`].
///
/// Nodes taken off the open set are final and never reopened, which is only
/// correct for consistent heuristics such as the Euclidean distance on a
/// grid with Euclidean step costs.
#[derive(Clone, Debug)]
pub struct PathFinder<A> {
    pather: A,
}

impl<A: AstarPather> PathFinder<A> {
    /// Create a path finder for the graph described by `pather`.
    pub fn new(pather: A) -> Self {
        Self { pather }
    }

    /// Compute the cheapest path from `start` to `goal`.
    ///
    /// Returns the full path including both endpoints, or an empty `Vec` if
    /// `goal` cannot be reached.
    pub fn compute_path(&self, start: A::Point, goal: A::Point) -> Vec<A::Point> {
        let mut open = PriorityQueueSet::new(Node::by_f_cost);
        let mut closed: HashSet<A::Point> = HashSet::new();
        // Closed nodes as (point, parent) so paths can be walked back.
        let mut arena: Vec<(A::Point, Option<usize>)> = Vec::new();
        let mut nbuf = Vec::with_capacity(8);

        open.add(Node {
            point: start,
            g: 0.0,
            f: self.pather.estimate(start, goal),
            parent: None,
        });

        while let Ok(current) = open.pop_smallest() {
            if current.point == goal {
                log::trace!("astar: reached goal after expanding {} nodes", arena.len());
                return reconstruct(&arena, current.point, current.parent);
            }

            let ci = arena.len();
            arena.push((current.point, current.parent));
            closed.insert(current.point);

            nbuf.clear();
            self.pather.neighbors(current.point, &mut nbuf);

            for &succ in nbuf.iter() {
                if closed.contains(&succ) {
                    continue;
                }
                let g = current.g + self.pather.cost(current.point, succ);
                open.add(Node {
                    point: succ,
                    g,
                    f: g + self.pather.estimate(succ, goal),
                    parent: Some(ci),
                });
            }
        }

        log::trace!("astar: goal unreachable after expanding {} nodes", arena.len());
        Vec::new()
    }

    /// Sum of step costs along `path`. Zero for paths shorter than two points.
    pub fn path_cost(&self, path: &[A::Point]) -> f64 {
        path.windows(2)
            .map(|w| self.pather.cost(w[0], w[1]))
            .sum()
    }
}

fn reconstruct<P: Copy>(arena: &[(P, Option<usize>)], last: P, parent: Option<usize>) -> Vec<P> {
    let mut path = vec![last];
    let mut next = parent;
    while let Some(i) = next {
        let (p, up) = arena[i];
        path.push(p);
        next = up;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FnPather;
    use rand::rngs::StdRng;
    use rand::{RngExt, SeedableRng};
    use tdpath_core::{Coord, GridMap};

    const SCENARIO_BLOCKED: [(i32, i32); 8] = [
        (1, 1),
        (0, 2),
        (1, 2),
        (0, 3),
        (1, 3),
        (2, 3),
        (2, 5),
        (2, 7),
    ];

    fn scenario_map() -> GridMap {
        let mut g = GridMap::new(8, 8).unwrap();
        for (r, c) in SCENARIO_BLOCKED {
            g.set_blocked(Coord::new(r, c), true).unwrap();
        }
        g
    }

    fn assert_valid_path(g: &GridMap, path: &[Coord], start: Coord, goal: Coord) {
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        for w in path.windows(2) {
            assert!(w[0].is_adjacent(w[1]), "{} -> {} is not a grid step", w[0], w[1]);
            assert!(!g.is_blocked(w[1]), "{} is blocked", w[1]);
        }
    }

    /// Exact cheapest cost from every cell to `goal` by repeated relaxation
    /// over all edges until nothing changes.
    fn exhaustive_costs(g: &GridMap, goal: Coord) -> Vec<f64> {
        let rng = g.range();
        let mut dist = vec![f64::INFINITY; rng.len()];
        if let Some(gi) = rng.index(goal) {
            dist[gi] = 0.0;
        }
        loop {
            let mut changed = false;
            for c in rng.iter() {
                let Some(ci) = rng.index(c) else { continue };
                for n in g.successors(c) {
                    let Some(ni) = rng.index(n) else { continue };
                    let via = dist[ni] + g.move_cost(c, n);
                    if via < dist[ci] {
                        dist[ci] = via;
                        changed = true;
                    }
                }
            }
            if !changed {
                return dist;
            }
        }
    }

    #[test]
    fn scenario_path_found() {
        let g = scenario_map();
        let pf = PathFinder::new(&g);
        let start = Coord::new(0, 0);
        let goal = Coord::new(1, 7);
        let path = pf.compute_path(start, goal);
        assert!(!path.is_empty());
        assert_valid_path(&g, &path, start, goal);
        // Round the wall at column 3 through row 3.
        assert_eq!(pf.path_cost(&path), 12.0);
    }

    #[test]
    fn scenario_sealed_start_has_no_path() {
        let mut g = scenario_map();
        g.set_blocked(Coord::new(1, 0), true).unwrap();
        g.set_blocked(Coord::new(0, 1), true).unwrap();
        let path = PathFinder::new(&g).compute_path(Coord::new(0, 0), Coord::new(1, 7));
        assert!(path.is_empty());
    }

    #[test]
    fn start_equals_goal() {
        let g = GridMap::new(5, 5).unwrap();
        let pf = PathFinder::new(&g);
        for c in g.range() {
            let path = pf.compute_path(c, c);
            assert_eq!(path, vec![c]);
            assert_eq!(pf.path_cost(&path), 0.0);
        }
    }

    #[test]
    fn open_grid_cost_is_manhattan() {
        let g = GridMap::new(6, 6).unwrap();
        let pf = PathFinder::new(&g);
        let start = Coord::new(0, 0);
        let goal = Coord::new(5, 4);
        let path = pf.compute_path(start, goal);
        assert_valid_path(&g, &path, start, goal);
        assert_eq!(path.len(), 10);
        assert_eq!(pf.path_cost(&path), 9.0);
    }

    #[test]
    fn goal_walled_in() {
        let mut g = GridMap::new(5, 5).unwrap();
        let goal = Coord::new(2, 2);
        for n in goal.neighbors_4() {
            g.set_blocked(n, true).unwrap();
        }
        let pf = PathFinder::new(&g);
        for c in g.range() {
            if c == goal || g.is_blocked(c) {
                continue;
            }
            assert!(pf.compute_path(c, goal).is_empty(), "path from {c}");
        }
        // Only successors are filtered, so a search may leave a blocked start.
        let wall = Coord::new(1, 2);
        assert_eq!(pf.compute_path(wall, goal), vec![wall, goal]);
    }

    #[test]
    fn far_out_of_bounds_start_has_no_path() {
        let g = GridMap::new(4, 4).unwrap();
        let pf = PathFinder::new(&g);
        assert!(pf.compute_path(Coord::new(i32::MAX, 0), Coord::ZERO).is_empty());
        assert!(pf.compute_path(Coord::new(i32::MIN, i32::MAX), Coord::ZERO).is_empty());
    }

    #[test]
    fn random_grids_paths_are_valid_and_optimal() {
        let mut rng = StdRng::seed_from_u64(0x7d);
        for _ in 0..200 {
            let rows = rng.random_range(1..=6);
            let cols = rng.random_range(1..=6);
            let mut g = GridMap::new(rows, cols).unwrap();
            for c in g.range() {
                if rng.random_bool(0.3) {
                    g.set_blocked(c, true).unwrap();
                }
            }
            let goal = Coord::new(rng.random_range(0..rows), rng.random_range(0..cols));
            g.set_blocked(goal, false).unwrap();

            let best = exhaustive_costs(&g, goal);
            let pf = PathFinder::new(&g);
            for start in g.range() {
                if g.is_blocked(start) {
                    continue;
                }
                let path = pf.compute_path(start, goal);
                let expected = best[g.range().index(start).unwrap()];
                if expected.is_infinite() {
                    assert!(path.is_empty(), "{start} -> {goal} should be unreachable");
                } else {
                    assert_valid_path(&g, &path, start, goal);
                    assert!((pf.path_cost(&path) - expected).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn closures_as_pather() {
        // A 1-D corridor 0..=9 with a hole at 5; 4 and 6 are linked directly
        // at a higher cost.
        let pather = FnPather::new(
            |p: i32| {
                let mut out = Vec::new();
                for n in [p - 1, p + 1] {
                    if (0..=9).contains(&n) && n != 5 {
                        out.push(n);
                    }
                }
                match p {
                    4 => out.push(6),
                    6 => out.push(4),
                    _ => {}
                }
                out
            },
            |a: i32, b: i32| if (a - b).abs() == 2 { 3.0 } else { 1.0 },
            |a: i32, b: i32| f64::from((a - b).abs()) / 2.0,
        );
        let pf = PathFinder::new(pather);
        let path = pf.compute_path(0, 9);
        assert_eq!(path, vec![0, 1, 2, 3, 4, 6, 7, 8, 9]);
        assert_eq!(pf.path_cost(&path), 10.0);
        assert!(pf.compute_path(0, 5).is_empty());
    }

    #[test]
    fn node_identity_ignores_cost() {
        let a = Node {
            point: Coord::new(1, 1),
            g: 1.0,
            f: 4.0,
            parent: None,
        };
        let b = Node {
            point: Coord::new(1, 1),
            g: 0.5,
            f: 2.0,
            parent: Some(3),
        };
        assert_eq!(a.key(), b.key());
        assert_eq!(Node::by_f_cost(&b, &a), Ordering::Less);
    }
}

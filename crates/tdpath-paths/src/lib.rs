//! Pathfinding for tower-defence grids.
//!
//! This crate provides:
//!
//! - a keyed min-priority queue with decrease-key ([`PriorityQueueSet`])
//! - a generic **A\*** engine ([`PathFinder`]) over any graph described by
//!   the pather traits, or by three closures ([`FnPather`])
//! - [`GridPath`], which owns a [`GridMap`](tdpath_core::GridMap), a goal,
//!   and a cache of next steps toward that goal, and validates tower
//!   placements so they never cut the route off
//!
//! # Trait hierarchy
//!
//! | Trait | Provides |
//! |---|---|
//! | [`Pather`] | successor enumeration |
//! | [`WeightedPather`] : [`Pather`] | step cost |
//! | [`AstarPather`] : [`WeightedPather`] | heuristic estimate, required by A* |
//!
//! [`GridMap`](tdpath_core::GridMap) implements all three with 4-way moves
//! and Euclidean distance as both cost and heuristic.

mod astar;
mod gridpath;
mod pqset;
mod traits;

pub use astar::PathFinder;
pub use gridpath::{GridPath, Placement};
pub use pqset::{Keyed, PriorityQueueSet, QueueError};
pub use traits::{AstarPather, FnPather, Pather, WeightedPather};

//! **tdpath-core**: grid occupancy types for tower-defence pathfinding.
//!
//! This crate provides the foundational types shared by the search crate
//! and the demo field: the [`Coord`] cell identifier, the row/col
//! [`Range`] rectangle, the [`GridMap`] occupancy grid and its
//! [`GridError`] type.

pub mod error;
pub mod geom;
pub mod grid;

pub use error::GridError;
pub use geom::{Coord, Range};
pub use grid::GridMap;

//! Graph algorithms
//!
//! Read-only routines over [`crate::graph::GraphStore`]; they never persist
//! or notify.

pub mod pathfinding;

pub use pathfinding::{find_path, traverse, PathResult, Subgraph};

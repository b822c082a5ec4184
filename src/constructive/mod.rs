//! Constructive heuristics for building the starting solution.
//!
//! - [`nearest_neighbor`] — Greedy nearest-neighbor route building, O(n²)

mod nearest_neighbor;

pub use nearest_neighbor::nearest_neighbor;

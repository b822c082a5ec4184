//! Distance matrices.
//!
//! Provides the dense, precomputed inter-node distance table every search
//! component reads from.

mod matrix;

pub use matrix::{DistanceMatrix, MAX_DISTANCE};

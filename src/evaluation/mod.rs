//! Cost and feasibility bookkeeping.
//!
//! - [`recompute_route`] / [`recompute_solution`] refresh cached loads and costs
//! - [`check_solution`] audits a solution against the structural invariants

mod evaluator;

pub use evaluator::{check_solution, recompute_route, recompute_solution, UNASSIGNED_PENALTY};

//! ALNS (Adaptive Large Neighborhood Search) for the CVRP.
//!
//! - [`destroy`] — Destroy operators (random, worst, Shaw)
//! - [`repair`] — Repair operators (greedy insertion, regret-2 insertion)
//! - [`selection`] — Roulette-wheel selection with adaptive weights
//! - [`acceptance`] — Simulated annealing acceptance
//! - [`AlnsRunner`] — The search loop
//!
//! # Reference
//!
//! Ropke, S. & Pisinger, D. (2006). "An Adaptive Large Neighborhood Search
//! Heuristic for the Pickup and Delivery Problem with Time Windows",
//! *Transportation Science* 40(4), 455-472.

pub mod acceptance;
mod config;
pub mod destroy;
pub mod repair;
mod runner;
pub mod selection;
mod types;

pub use acceptance::{Outcome, SimulatedAnnealing};
pub use config::AlnsConfig;
pub use destroy::{Destroy, DestroyKind};
pub use repair::RepairKind;
pub use runner::{AlnsResult, AlnsRunner, Improvement};
pub use selection::{select_operator, AdaptiveWeights};
pub use types::{DestroyOperator, RepairOperator};

//! # u-cvrp
//!
//! Capacitated vehicle routing with Adaptive Large Neighborhood Search.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Node, Instance, Route, Solution)
//! - [`distance`] — Rounded Euclidean distance matrix
//! - [`evaluation`] — Route and solution cost evaluation, invariant checks
//! - [`constructive`] — Nearest neighbor starting solution
//! - [`alns`] — Destroy/repair operators, adaptive selection, SA acceptance, search loop
//! - [`io`] — TSPLIB-style instance loader and route export
//! - [`random`] — Seeded random number generation
//!
//! ## Example
//!
//! ```
//! use u_cvrp::alns::{AlnsConfig, AlnsRunner};
//! use u_cvrp::io::parse_instance;
//!
//! let text = "DIMENSION : 4\nCAPACITY : 20\n\
//!             NODE_COORD_SECTION\n1 0 0\n2 0 10\n3 10 0\n4 10 10\n\
//!             DEMAND_SECTION\n2 8\n3 8\n4 8\nEOF\n";
//! let instance = parse_instance(text).unwrap();
//!
//! let config = AlnsConfig::default().with_max_iterations(500).with_seed(1);
//! let result = AlnsRunner::run(&instance, &config).unwrap();
//! assert!(result.best.is_complete());
//! assert!(result.best.routes.iter().all(|r| r.load <= 20));
//! ```

pub mod alns;
pub mod constructive;
pub mod distance;
pub mod evaluation;
pub mod io;
pub mod models;
pub mod random;

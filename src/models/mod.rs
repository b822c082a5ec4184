//! Domain model types for the capacitated vehicle routing problem.
//!
//! Provides the core abstractions: nodes with demands, the immutable instance
//! with its distance table, routes as ordered customer sequences, and
//! solutions with their pool of unassigned customers.

mod instance;
mod node;
mod route;
mod solution;

pub use instance::Instance;
pub use node::Node;
pub use route::Route;
pub use solution::{Solution, Violation, ViolationType};

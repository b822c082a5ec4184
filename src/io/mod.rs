//! Instance loading and solution export.

mod export;
mod loader;

pub use export::{export_solution, write_routes};
pub use loader::{load_instance, parse_instance, InstanceError, MAX_COORDINATE};

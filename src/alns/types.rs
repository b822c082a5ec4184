//! Core traits for ALNS operators.

use rand::Rng;

use crate::models::{Instance, Solution};

/// A destroy operator moves customers from routes into the unassigned pool.
///
/// Implementations remove up to `q` customers, drop any route left empty,
/// and re-evaluate the solution before returning.
///
/// # References
///
/// Ropke & Pisinger (2006), Section 2
pub trait DestroyOperator {
    /// Returns a human-readable name for this operator.
    fn name(&self) -> &str;

    /// Removes up to `q` customers from `solution` in place.
    fn destroy<R: Rng>(&self, solution: &mut Solution, q: usize, instance: &Instance, rng: &mut R);
}

/// A repair operator reinserts unassigned customers into routes.
///
/// Implementations place every customer that has a capacity-feasible slot
/// (opening new routes as needed) and re-evaluate the solution before
/// returning. Customers that cannot be placed anywhere stay unassigned.
///
/// # References
///
/// Ropke & Pisinger (2006), Section 2
pub trait RepairOperator {
    /// Returns a human-readable name for this operator.
    fn name(&self) -> &str;

    /// Reinserts unassigned customers of `solution` in place.
    fn repair<R: Rng>(&self, solution: &mut Solution, instance: &Instance, rng: &mut R);
}

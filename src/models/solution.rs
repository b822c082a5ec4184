//! Solution and violation types.

use serde::Serialize;

use super::Route;

/// A type of invariant violation in a solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationType {
    /// Route load exceeds vehicle capacity.
    CapacityExceeded {
        /// Route index in the solution.
        route_index: usize,
        /// Load that exceeded capacity.
        load: i32,
        /// Vehicle capacity.
        capacity: i32,
    },
    /// A customer appears more than once across routes and unassigned pool.
    DuplicateCustomer {
        /// The repeated customer.
        customer: usize,
    },
    /// A customer appears neither in a route nor in the unassigned pool.
    MissingCustomer {
        /// The omitted customer.
        customer: usize,
    },
    /// A route references the depot or a node outside the instance.
    InvalidNode {
        /// Route index in the solution.
        route_index: usize,
        /// Offending node index.
        node: usize,
    },
    /// A route with no customers is still stored in the solution.
    EmptyRoute {
        /// Route index in the solution.
        route_index: usize,
    },
    /// A cached cost or load disagrees with a fresh evaluation.
    StaleCost {
        /// Route index, or `None` for the solution total.
        route_index: Option<usize>,
        /// Cached value.
        cached: i64,
        /// Recomputed value.
        actual: i64,
    },
}

/// An invariant violation in a solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}

/// A CVRP solution: routes plus customers not currently placed.
///
/// Every customer `1..dimension` lives in exactly one route path or in
/// `unassigned`. `total_cost` is a cache maintained by
/// [`recompute_solution`](crate::evaluation::recompute_solution).
///
/// # Examples
///
/// ```
/// use u_cvrp::models::{Route, Solution};
///
/// let sol = Solution::new(vec![Route::from_path(vec![1, 2])], vec![3]);
/// assert_eq!(sol.num_routes(), 1);
/// assert_eq!(sol.num_served(), 2);
/// assert!(!sol.is_complete());
/// assert_eq!(sol.position_of(2), Some((0, 1)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Solution {
    /// Routes in order; never holds an empty route after an operator returns.
    pub routes: Vec<Route>,
    /// Customers not placed in any route.
    pub unassigned: Vec<usize>,
    /// Sum of route costs plus the unassigned penalty.
    pub total_cost: i64,
}

impl Solution {
    /// Creates an unevaluated solution.
    pub fn new(routes: Vec<Route>, unassigned: Vec<usize>) -> Self {
        Self {
            routes,
            unassigned,
            total_cost: 0,
        }
    }

    /// Builds an unevaluated solution from raw customer sequences.
    pub fn from_paths(paths: Vec<Vec<usize>>, unassigned: Vec<usize>) -> Self {
        Self::new(paths.into_iter().map(Route::from_path).collect(), unassigned)
    }

    /// Number of routes (vehicles used).
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Number of customers placed in routes.
    pub fn num_served(&self) -> usize {
        self.routes.iter().map(Route::len).sum()
    }

    /// Returns `true` when every customer is placed.
    pub fn is_complete(&self) -> bool {
        self.unassigned.is_empty()
    }

    /// Sum of route costs, excluding any penalty.
    pub fn distance(&self) -> i64 {
        self.routes.iter().map(|r| r.cost).sum()
    }

    /// Routes as plain customer sequences.
    pub fn paths(&self) -> Vec<Vec<usize>> {
        self.routes.iter().map(|r| r.path.clone()).collect()
    }

    /// Locates `customer` as `(route_index, position)`.
    pub fn position_of(&self, customer: usize) -> Option<(usize, usize)> {
        self.routes.iter().enumerate().find_map(|(ri, route)| {
            route
                .path
                .iter()
                .position(|&c| c == customer)
                .map(|pos| (ri, pos))
        })
    }

    /// Moves `customer` from its route to `unassigned`, dropping the route
    /// if it becomes empty.
    ///
    /// Returns `false` if the customer isn't in any route.
    pub fn unassign(&mut self, customer: usize) -> bool {
        match self.position_of(customer) {
            Some((ri, pos)) => {
                self.unassign_at(ri, pos);
                true
            }
            None => false,
        }
    }

    /// Moves the customer at `(route_index, pos)` to `unassigned`, dropping
    /// the route if it becomes empty. Returns the moved customer.
    pub fn unassign_at(&mut self, route_index: usize, pos: usize) -> usize {
        let customer = self.routes[route_index].path.remove(pos);
        if self.routes[route_index].is_empty() {
            self.routes.remove(route_index);
        }
        self.unassigned.push(customer);
        customer
    }

    /// Removes empty routes.
    pub fn remove_empty_routes(&mut self) {
        self.routes.retain(|r| !r.is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solution_empty() {
        let sol = Solution::default();
        assert_eq!(sol.num_routes(), 0);
        assert_eq!(sol.num_served(), 0);
        assert!(sol.is_complete());
        assert_eq!(sol.total_cost, 0);
    }

    #[test]
    fn test_position_of() {
        let sol = Solution::from_paths(vec![vec![1, 2], vec![3, 4]], vec![]);
        assert_eq!(sol.position_of(4), Some((1, 1)));
        assert_eq!(sol.position_of(1), Some((0, 0)));
        assert_eq!(sol.position_of(9), None);
    }

    #[test]
    fn test_unassign_drops_empty_route() {
        let mut sol = Solution::from_paths(vec![vec![1], vec![2, 3]], vec![]);
        assert!(sol.unassign(1));
        assert_eq!(sol.num_routes(), 1);
        assert_eq!(sol.routes[0].path, vec![2, 3]);
        assert_eq!(sol.unassigned, vec![1]);
    }

    #[test]
    fn test_unassign_missing() {
        let mut sol = Solution::from_paths(vec![vec![1]], vec![2]);
        assert!(!sol.unassign(2));
        assert_eq!(sol.unassigned, vec![2]);
    }

    #[test]
    fn test_unassign_at() {
        let mut sol = Solution::from_paths(vec![vec![1, 2, 3]], vec![]);
        assert_eq!(sol.unassign_at(0, 1), 2);
        assert_eq!(sol.routes[0].path, vec![1, 3]);
        assert_eq!(sol.unassigned, vec![2]);
    }

    #[test]
    fn test_remove_empty_routes() {
        let mut sol = Solution::from_paths(vec![vec![1], vec![], vec![2]], vec![]);
        sol.remove_empty_routes();
        assert_eq!(sol.num_routes(), 2);
    }

    #[test]
    fn test_violation_types() {
        let v = Violation::new(ViolationType::CapacityExceeded {
            route_index: 0,
            load: 250,
            capacity: 200,
        });
        assert!(matches!(
            v.kind,
            ViolationType::CapacityExceeded { load: 250, .. }
        ));
    }
}

//! Route type.

use serde::Serialize;

/// An ordered sequence of customers served by one vehicle.
///
/// The depot is implicit at both ends and never stored in `path`. `load` and
/// `cost` are caches maintained by [`recompute_route`](crate::evaluation::recompute_route).
///
/// # Examples
///
/// ```
/// use u_cvrp::models::Route;
///
/// let route = Route::from_path(vec![3, 1, 2]);
/// assert_eq!(route.len(), 3);
/// assert_eq!(route.cost, 0); // not evaluated yet
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Route {
    /// Customer node indices in visit order.
    pub path: Vec<usize>,
    /// Sum of demands along `path`.
    pub load: i32,
    /// Total distance including both depot legs.
    pub cost: i64,
}

impl Route {
    /// Creates an empty route.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an unevaluated route over `path`.
    pub fn from_path(path: Vec<usize>) -> Self {
        Self {
            path,
            load: 0,
            cost: 0,
        }
    }

    /// Number of customers on the route.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Returns `true` if the route visits no customer.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Predecessor and successor of position `pos`, with the depot at the ends.
    pub fn neighbors(&self, pos: usize) -> (usize, usize) {
        let prev = if pos == 0 { 0 } else { self.path[pos - 1] };
        let next = if pos + 1 >= self.path.len() {
            0
        } else {
            self.path[pos + 1]
        };
        (prev, next)
    }

    /// Nodes bracketing insertion slot `slot` (0..=len).
    pub fn slot_bounds(&self, slot: usize) -> (usize, usize) {
        let prev = if slot == 0 { 0 } else { self.path[slot - 1] };
        let next = if slot == self.path.len() {
            0
        } else {
            self.path[slot]
        };
        (prev, next)
    }
}

//! Nearest-neighbor constructive heuristic.
//!
//! Builds routes greedily: starting from the depot, always visit the nearest
//! unvisited customer that still fits. When none fits, start a new route.
//!
//! # Complexity
//!
//! O(n²) where n = number of customers.

use crate::evaluation::recompute_solution;
use crate::models::{Instance, Route, Solution};

/// Constructs a starting solution with the nearest-neighbor heuristic.
///
/// Ties on distance go to the lowest customer index. Customers whose demand
/// alone exceeds the capacity can never be routed and end up in
/// `unassigned`.
///
/// # Examples
///
/// ```
/// use u_cvrp::models::{Instance, Node};
/// use u_cvrp::constructive::nearest_neighbor;
///
/// let instance = Instance::new(
///     30,
///     vec![
///         Node::depot(0.0, 0.0),
///         Node::new(1, 1.0, 0.0, 10),
///         Node::new(2, 2.0, 0.0, 10),
///         Node::new(3, 3.0, 0.0, 10),
///     ],
/// );
///
/// let solution = nearest_neighbor(&instance);
/// assert_eq!(solution.num_served(), 3);
/// assert!(solution.is_complete());
/// assert_eq!(solution.total_cost, 6);
/// ```
pub fn nearest_neighbor(instance: &Instance) -> Solution {
    let n = instance.dimension();
    let mut solution = Solution::default();
    if n <= 1 {
        return solution;
    }

    let mut visited = vec![false; n];
    visited[0] = true;
    let mut remaining = n - 1;

    while remaining > 0 {
        let mut path = Vec::new();
        let mut current = 0;
        let mut load: i32 = 0;

        loop {
            // Ascending order, so the lowest index wins distance ties.
            let candidates: Vec<usize> = (1..n)
                .filter(|&i| !visited[i] && instance.fits(load, i))
                .collect();

            match instance.distances().nearest_neighbor(current, &candidates) {
                Some(next) => {
                    visited[next] = true;
                    remaining -= 1;
                    path.push(next);
                    load += instance.demand(next);
                    current = next;
                }
                None => break,
            }
        }

        if path.is_empty() {
            // Nothing left fits an empty vehicle.
            solution
                .unassigned
                .extend((1..n).filter(|&i| !visited[i]));
            break;
        }
        solution.routes.push(Route::from_path(path));
    }

    recompute_solution(&mut solution, instance);
    solution
}

//! Route and solution evaluation.

use crate::models::{Instance, Route, Solution, Violation, ViolationType};

/// Cost charged per unassigned customer.
///
/// Must exceed any plausible route-cost difference for the instance sizes at
/// hand so that a solution with fewer unassigned customers always ranks
/// better. Ten million is comfortably above the total distance of the
/// standard CVRP benchmarks (a few hundred nodes on a 1000×1000 grid).
pub const UNASSIGNED_PENALTY: i64 = 10_000_000;

/// Recomputes a route's `load` and `cost` from its path.
///
/// An empty path yields `load = 0` and `cost = 0`.
///
/// # Examples
///
/// ```
/// use u_cvrp::models::{Instance, Node, Route};
/// use u_cvrp::evaluation::recompute_route;
///
/// let instance = Instance::new(
///     100,
///     vec![
///         Node::depot(0.0, 0.0),
///         Node::new(1, 3.0, 4.0, 10),
///         Node::new(2, 6.0, 8.0, 20),
///     ],
/// );
/// let mut route = Route::from_path(vec![1, 2]);
/// recompute_route(&mut route, &instance);
/// assert_eq!(route.load, 30);
/// assert_eq!(route.cost, 5 + 5 + 10);
/// ```
pub fn recompute_route(route: &mut Route, instance: &Instance) {
    let (load, cost) = route_metrics(&route.path, instance);
    route.load = load;
    route.cost = cost;
}

/// Recomputes every route and the solution total, including the penalty
/// for unassigned customers.
pub fn recompute_solution(solution: &mut Solution, instance: &Instance) {
    let mut total: i64 = 0;
    for route in &mut solution.routes {
        recompute_route(route, instance);
        total = total.saturating_add(route.cost);
    }
    solution.total_cost = total.saturating_add(penalty(solution.unassigned.len()));
}

fn penalty(unassigned: usize) -> i64 {
    i64::try_from(unassigned)
        .unwrap_or(i64::MAX)
        .saturating_mul(UNASSIGNED_PENALTY)
}

/// Load and cost of a customer sequence, depot at both ends.
///
/// Both sums saturate, so an overloaded path reports `i32::MAX` rather than
/// wrapping below the capacity.
fn route_metrics(path: &[usize], instance: &Instance) -> (i32, i64) {
    let (Some(&first), Some(&last)) = (path.first(), path.last()) else {
        return (0, 0);
    };

    let mut cost = instance.dist(0, first);
    for w in path.windows(2) {
        cost = cost.saturating_add(instance.dist(w[0], w[1]));
    }
    cost = cost.saturating_add(instance.dist(last, 0));

    let load = path
        .iter()
        .fold(0i32, |acc, &c| acc.saturating_add(instance.demand(c)));
    (load, cost)
}

/// Audits a solution against the structural invariants without mutating it.
///
/// Reports capacity overruns, customers placed twice or never, references to
/// the depot or unknown nodes, stored empty routes, and cached costs or loads
/// that disagree with a fresh evaluation. A valid solution yields an empty
/// list.
pub fn check_solution(solution: &Solution, instance: &Instance) -> Vec<Violation> {
    let n = instance.dimension();
    let mut seen = vec![0usize; n];
    let mut violations = Vec::new();
    let mut total: i64 = 0;

    for (idx, route) in solution.routes.iter().enumerate() {
        if route.is_empty() {
            violations.push(Violation::new(ViolationType::EmptyRoute { route_index: idx }));
        }
        for &c in &route.path {
            if c == 0 || c >= n {
                violations.push(Violation::new(ViolationType::InvalidNode {
                    route_index: idx,
                    node: c,
                }));
            } else {
                seen[c] += 1;
            }
        }
        if route.path.iter().any(|&c| c == 0 || c >= n) {
            continue;
        }

        let (load, cost) = route_metrics(&route.path, instance);
        total = total.saturating_add(cost);
        if load > instance.capacity() {
            violations.push(Violation::new(ViolationType::CapacityExceeded {
                route_index: idx,
                load,
                capacity: instance.capacity(),
            }));
        }
        if route.load != load {
            violations.push(Violation::new(ViolationType::StaleCost {
                route_index: Some(idx),
                cached: i64::from(route.load),
                actual: i64::from(load),
            }));
        }
        if route.cost != cost {
            violations.push(Violation::new(ViolationType::StaleCost {
                route_index: Some(idx),
                cached: route.cost,
                actual: cost,
            }));
        }
    }

    for &c in &solution.unassigned {
        if c > 0 && c < n {
            seen[c] += 1;
        }
    }

    for (customer, &count) in seen.iter().enumerate().skip(1) {
        match count {
            0 => violations.push(Violation::new(ViolationType::MissingCustomer { customer })),
            1 => {}
            _ => violations.push(Violation::new(ViolationType::DuplicateCustomer { customer })),
        }
    }

    let expected_total = total.saturating_add(penalty(solution.unassigned.len()));
    if solution.total_cost != expected_total {
        violations.push(Violation::new(ViolationType::StaleCost {
            route_index: None,
            cached: solution.total_cost,
            actual: expected_total,
        }));
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Node;

    fn setup() -> Instance {
        Instance::new(
            50,
            vec![
                Node::depot(0.0, 0.0),
                Node::new(1, 3.0, 4.0, 10),
                Node::new(2, 6.0, 8.0, 20),
                Node::new(3, 0.0, 10.0, 15),
            ],
        )
    }

    #[test]
    fn test_recompute_route_empty() {
        let inst = setup();
        let mut route = Route::new();
        route.cost = 99;
        route.load = 7;
        recompute_route(&mut route, &inst);
        assert_eq!(route.cost, 0);
        assert_eq!(route.load, 0);
    }

    #[test]
    fn test_recompute_route_single() {
        let inst = setup();
        let mut route = Route::from_path(vec![1]);
        recompute_route(&mut route, &inst);
        assert_eq!(route.cost, 10);
        assert_eq!(route.load, 10);
    }

    #[test]
    fn test_recompute_route_three() {
        let inst = setup();
        let mut route = Route::from_path(vec![1, 2, 3]);
        recompute_route(&mut route, &inst);
        // 0→1 = 5, 1→2 = 5, 2→3 = sqrt(40) ≈ 6, 3→0 = 10
        assert_eq!(route.cost, 26);
        assert_eq!(route.load, 45);
    }

    #[test]
    fn test_recompute_solution_penalty() {
        let inst = setup();
        let mut sol = Solution::from_paths(vec![vec![1, 2]], vec![3]);
        recompute_solution(&mut sol, &inst);
        assert_eq!(sol.routes[0].cost, 20);
        assert_eq!(sol.total_cost, 20 + UNASSIGNED_PENALTY);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let inst = setup();
        let mut sol = Solution::from_paths(vec![vec![3, 1], vec![2]], vec![]);
        recompute_solution(&mut sol, &inst);
        let first = sol.clone();
        recompute_solution(&mut sol, &inst);
        assert_eq!(sol, first);
    }

    #[test]
    fn test_check_valid_solution() {
        let inst = setup();
        let mut sol = Solution::from_paths(vec![vec![1, 2], vec![3]], vec![]);
        recompute_solution(&mut sol, &inst);
        assert!(check_solution(&sol, &inst).is_empty());
    }

    #[test]
    fn test_check_capacity_exceeded() {
        let inst = Instance::new(40, setup().nodes().to_vec());
        let mut sol = Solution::from_paths(vec![vec![1, 2, 3]], vec![]);
        recompute_solution(&mut sol, &inst);
        let violations = check_solution(&sol, &inst);
        assert_eq!(violations.len(), 1);
        assert!(matches!(
            violations[0].kind,
            ViolationType::CapacityExceeded {
                route_index: 0,
                load: 45,
                capacity: 40,
            }
        ));
    }

    #[test]
    fn test_check_duplicate_and_missing() {
        let inst = setup();
        let mut sol = Solution::from_paths(vec![vec![1, 2]], vec![1]);
        recompute_solution(&mut sol, &inst);
        let violations = check_solution(&sol, &inst);
        assert!(violations
            .iter()
            .any(|v| v.kind == ViolationType::DuplicateCustomer { customer: 1 }));
        assert!(violations
            .iter()
            .any(|v| v.kind == ViolationType::MissingCustomer { customer: 3 }));
    }

    #[test]
    fn test_check_stale_cost() {
        let inst = setup();
        let mut sol = Solution::from_paths(vec![vec![1, 2, 3]], vec![]);
        recompute_solution(&mut sol, &inst);
        // [1, 3, 2] costs 5 + 7 + 6 + 10 = 28 against the cached 26
        sol.routes[0].path.swap(1, 2);
        let violations = check_solution(&sol, &inst);
        assert!(violations.iter().any(|v| matches!(
            v.kind,
            ViolationType::StaleCost {
                route_index: Some(0),
                cached: 26,
                actual: 28,
            }
        )));
    }

    #[test]
    fn test_huge_demands_saturate() {
        let inst = Instance::new(
            i32::MAX,
            vec![
                Node::depot(0.0, 0.0),
                Node::new(1, 1.0, 0.0, 2_000_000_000),
                Node::new(2, 2.0, 0.0, 2_000_000_000),
            ],
        );
        let sol = Solution::from_paths(vec![vec![1, 2]], vec![]);
        let violations = check_solution(&sol, &inst);
        assert!(violations.iter().any(|v| matches!(
            v.kind,
            ViolationType::CapacityExceeded { load: i32::MAX, .. }
        )));
    }

    #[test]
    fn test_huge_distances_saturate() {
        let inst = Instance::new(
            10,
            vec![
                Node::depot(0.0, 0.0),
                Node::new(1, 1e308, 0.0, 1),
                Node::new(2, -1e308, 0.0, 1),
                Node::new(3, 0.0, 1e308, 1),
                Node::new(4, 0.0, -1e308, 1),
            ],
        );
        // five clamped legs add up past i64::MAX
        let mut sol = Solution::from_paths(vec![vec![1, 2, 3, 4]], vec![]);
        recompute_solution(&mut sol, &inst);
        assert_eq!(sol.total_cost, i64::MAX);
    }

    #[test]
    fn test_check_depot_in_route() {
        let inst = setup();
        let sol = Solution::from_paths(vec![vec![1, 0, 2]], vec![3]);
        let violations = check_solution(&sol, &inst);
        assert!(violations.iter().any(|v| v.kind
            == ViolationType::InvalidNode {
                route_index: 0,
                node: 0
            }));
    }
}

//! Repair operators for ALNS-based CVRP optimization.
//!
//! # Operators
//!
//! - [`GreedyInsertion`] — Inserts each customer at its cheapest position
//! - [`RegretInsertion`] — Inserts the customer with the highest regret first
//!
//! # Reference
//!
//! Ropke, S. & Pisinger, D. (2006). "An Adaptive Large Neighborhood Search
//! Heuristic for the Pickup and Delivery Problem with Time Windows",
//! *Transportation Science* 40(4), 455-472.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::evaluation::{recompute_route, recompute_solution};
use crate::models::{Instance, Route, Solution};

use super::types::RepairOperator;

/// A candidate placement of one customer.
///
/// `route_index == solution.num_routes()` means "open a new route".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionMove {
    /// Customer to place.
    pub customer: usize,
    /// Target route, or the route count for a new route.
    pub route_index: usize,
    /// Slot within the target route (0..=len).
    pub position: usize,
    /// Marginal distance added by the placement.
    pub cost_increase: i64,
}

/// Finds the cheapest slot for `customer` in route `route_index`.
///
/// Returns `None` if the customer doesn't fit the route's remaining
/// capacity. The marginal cost of slot `p` is
/// `d(prev, c) + d(c, next) - d(prev, next)` with the depot at the ends;
/// ties keep the lowest slot.
///
/// # Examples
///
/// ```
/// use u_cvrp::models::{Instance, Node, Solution};
/// use u_cvrp::evaluation::recompute_solution;
/// use u_cvrp::alns::repair::find_best_position;
///
/// let instance = Instance::new(
///     100,
///     vec![
///         Node::depot(0.0, 0.0),
///         Node::new(1, 1.0, 0.0, 10),
///         Node::new(2, 2.0, 0.0, 10),
///         Node::new(3, 3.0, 0.0, 10),
///     ],
/// );
/// let mut sol = Solution::from_paths(vec![vec![1, 3]], vec![2]);
/// recompute_solution(&mut sol, &instance);
///
/// let mv = find_best_position(2, 0, &sol, &instance).expect("fits");
/// assert_eq!(mv.position, 1);
/// assert_eq!(mv.cost_increase, 0);
/// ```
pub fn find_best_position(
    customer: usize,
    route_index: usize,
    solution: &Solution,
    instance: &Instance,
) -> Option<InsertionMove> {
    let route = &solution.routes[route_index];
    if !instance.fits(route.load, customer) {
        return None;
    }

    let mut best: Option<InsertionMove> = None;
    for slot in 0..=route.len() {
        let (prev, next) = route.slot_bounds(slot);
        let cost = instance.dist(prev, customer) + instance.dist(customer, next)
            - instance.dist(prev, next);
        if best.is_none_or(|b| cost < b.cost_increase) {
            best = Some(InsertionMove {
                customer,
                route_index,
                position: slot,
                cost_increase: cost,
            });
        }
    }
    best
}

/// The option of serving `customer` on a fresh single-customer route.
///
/// Returns `None` if the customer's demand alone exceeds the capacity.
pub fn new_route_move(customer: usize, solution: &Solution, instance: &Instance) -> Option<InsertionMove> {
    instance.fits_alone(customer).then(|| InsertionMove {
        customer,
        route_index: solution.num_routes(),
        position: 0,
        cost_increase: instance.round_trip(customer),
    })
}

/// Every feasible option for `customer`: the best slot of each route that
/// has room, then the new-route option, sorted ascending by cost (stable).
pub fn insertion_options(customer: usize, solution: &Solution, instance: &Instance) -> Vec<InsertionMove> {
    let mut moves: Vec<InsertionMove> = (0..solution.num_routes())
        .filter_map(|ri| find_best_position(customer, ri, solution, instance))
        .chain(new_route_move(customer, solution, instance))
        .collect();
    moves.sort_by_key(|m| m.cost_increase);
    moves
}

/// Regret-2 value of a sorted option list.
///
/// The gap between the two cheapest options, or the only option's own cost
/// when there is just one, so customers without alternatives go first.
/// Returns `None` for an empty list.
pub fn regret_value(sorted_moves: &[InsertionMove]) -> Option<i64> {
    match sorted_moves {
        [] => None,
        [only] => Some(only.cost_increase),
        [first, second, ..] => Some(second.cost_increase - first.cost_increase),
    }
}

/// Commits `mv` and refreshes the affected route.
pub fn apply_move(solution: &mut Solution, mv: InsertionMove, instance: &Instance) {
    if mv.route_index >= solution.num_routes() {
        let mut route = Route::from_path(vec![mv.customer]);
        recompute_route(&mut route, instance);
        solution.routes.push(route);
    } else {
        let route = &mut solution.routes[mv.route_index];
        route.path.insert(mv.position, mv.customer);
        recompute_route(route, instance);
    }
}

/// Greedy insertion: places customers one at a time at their cheapest option.
///
/// The unassigned pool is shuffled first to avoid order bias. A new route is
/// opened only when it is strictly cheaper than every existing slot.
pub struct GreedyInsertion;

impl RepairOperator for GreedyInsertion {
    fn name(&self) -> &str {
        "greedy_insertion"
    }

    fn repair<R: Rng>(&self, solution: &mut Solution, instance: &Instance, rng: &mut R) {
        let mut pending = std::mem::take(&mut solution.unassigned);
        pending.shuffle(rng);
        let mut stranded = Vec::new();

        while let Some(customer) = pending.pop() {
            let mut best: Option<InsertionMove> = None;
            for ri in 0..solution.num_routes() {
                if let Some(mv) = find_best_position(customer, ri, solution, instance) {
                    if best.is_none_or(|b| mv.cost_increase < b.cost_increase) {
                        best = Some(mv);
                    }
                }
            }
            if let Some(mv) = new_route_move(customer, solution, instance) {
                if best.is_none_or(|b| mv.cost_increase < b.cost_increase) {
                    best = Some(mv);
                }
            }

            match best {
                Some(mv) => apply_move(solution, mv, instance),
                None => stranded.push(customer),
            }
        }

        solution.unassigned = stranded;
        recompute_solution(solution, instance);
    }
}

/// Regret-2 insertion: places the customer with the largest regret first.
///
/// Regret is the cost gap between a customer's best and second-best option.
/// Customers with high regret have few good alternatives and would be
/// stranded with an expensive insertion if placed late. Ties on regret keep
/// the earliest customer in the pool.
pub struct RegretInsertion;

impl RepairOperator for RegretInsertion {
    fn name(&self) -> &str {
        "regret_insertion"
    }

    fn repair<R: Rng>(&self, solution: &mut Solution, instance: &Instance, _rng: &mut R) {
        while !solution.unassigned.is_empty() {
            let mut best: Option<(usize, i64, InsertionMove)> = None;

            for (ui, &customer) in solution.unassigned.iter().enumerate() {
                let moves = insertion_options(customer, solution, instance);
                let Some(regret) = regret_value(&moves) else {
                    continue;
                };
                if best.is_none_or(|(_, r, _)| regret > r) {
                    best = Some((ui, regret, moves[0]));
                }
            }

            // Whatever is left has no feasible option at all.
            let Some((ui, _, mv)) = best else {
                break;
            };
            solution.unassigned.remove(ui);
            apply_move(solution, mv, instance);
        }

        recompute_solution(solution, instance);
    }
}

/// Built-in repair operators, dispatched by variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RepairKind {
    /// [`GreedyInsertion`]
    Greedy,
    /// [`RegretInsertion`]
    Regret,
}

impl RepairKind {
    /// All repair operators in selector order.
    pub const ALL: [RepairKind; 2] = [RepairKind::Greedy, RepairKind::Regret];

    /// Short label for progress output.
    pub fn label(self) -> &'static str {
        match self {
            RepairKind::Greedy => "Grd",
            RepairKind::Regret => "Reg",
        }
    }
}

impl RepairOperator for RepairKind {
    fn name(&self) -> &str {
        match self {
            RepairKind::Greedy => GreedyInsertion.name(),
            RepairKind::Regret => RegretInsertion.name(),
        }
    }

    fn repair<R: Rng>(&self, solution: &mut Solution, instance: &Instance, rng: &mut R) {
        match self {
            RepairKind::Greedy => GreedyInsertion.repair(solution, instance, rng),
            RepairKind::Regret => RegretInsertion.repair(solution, instance, rng),
        }
    }
}

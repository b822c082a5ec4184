//! Destroy operators for ALNS-based CVRP optimization.
//!
//! # Operators
//!
//! - [`RandomRemoval`] — Removes random customers
//! - [`WorstRemoval`] — Removes customers with the highest removal savings
//! - [`ShawRemoval`] — Removes related (nearby) customers
//!
//! # Reference
//!
//! Ropke, S. & Pisinger, D. (2006). "An Adaptive Large Neighborhood Search
//! Heuristic for the Pickup and Delivery Problem with Time Windows",
//! *Transportation Science* 40(4), 455-472.

use rand::Rng;
use serde::Serialize;

use crate::evaluation::recompute_solution;
use crate::models::{Instance, Route, Solution};

use super::types::DestroyOperator;

/// Removes random customers from the solution.
///
/// Simple but effective baseline operator that ensures diversity in the
/// search process. Each step picks a uniformly random route, then a
/// uniformly random position within it.
///
/// # Examples
///
/// ```
/// use u_cvrp::models::{Instance, Node, Solution};
/// use u_cvrp::alns::destroy::RandomRemoval;
/// use u_cvrp::alns::DestroyOperator;
/// use u_cvrp::random::create_rng;
///
/// let instance = Instance::new(
///     100,
///     vec![
///         Node::depot(0.0, 0.0),
///         Node::new(1, 1.0, 0.0, 10),
///         Node::new(2, 2.0, 0.0, 10),
///     ],
/// );
/// let mut sol = Solution::from_paths(vec![vec![1, 2]], vec![]);
///
/// let mut rng = create_rng(42);
/// RandomRemoval.destroy(&mut sol, 1, &instance, &mut rng);
/// assert_eq!(sol.unassigned.len(), 1);
/// ```
pub struct RandomRemoval;

impl DestroyOperator for RandomRemoval {
    fn name(&self) -> &str {
        "random_removal"
    }

    fn destroy<R: Rng>(&self, solution: &mut Solution, q: usize, instance: &Instance, rng: &mut R) {
        for _ in 0..q {
            let non_empty: Vec<usize> = solution
                .routes
                .iter()
                .enumerate()
                .filter(|(_, r)| !r.is_empty())
                .map(|(i, _)| i)
                .collect();
            if non_empty.is_empty() {
                break;
            }

            let ri = non_empty[rng.random_range(0..non_empty.len())];
            let pos = rng.random_range(0..solution.routes[ri].len());
            solution.unassign_at(ri, pos);
        }

        solution.remove_empty_routes();
        recompute_solution(solution, instance);
    }
}

/// Removes the customers whose removal saves the most distance.
///
/// Savings are computed once on the incoming solution and sorted in
/// descending order (stable, so ties keep route-then-position order).
/// Selected customers are then removed by identity, so earlier removals
/// never invalidate later picks.
///
/// By default the single worst entry is always taken. With
/// [`with_randomization`](Self::with_randomization) the pick becomes
/// `floor(y^p · |L|)` for `y ~ U[0, 1)`, biased toward the worst entries
/// (Ropke & Pisinger 2006, Section 4.1.2).
#[derive(Debug, Clone, Default)]
pub struct WorstRemoval {
    randomization: Option<f64>,
}

impl WorstRemoval {
    /// Creates a strict worst-first removal operator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables randomized selection with power `p` (`p >= 1`; larger is
    /// closer to strict worst-first).
    pub fn with_randomization(mut self, p: f64) -> Self {
        self.randomization = Some(p.max(1.0));
        self
    }
}

/// Distance saved by removing the customer at `pos`:
/// `d(prev, c) + d(c, next) - d(prev, next)`, depot at the route ends.
pub fn removal_saving(route: &Route, pos: usize, instance: &Instance) -> i64 {
    let c = route.path[pos];
    let (prev, next) = route.neighbors(pos);
    instance.dist(prev, c) + instance.dist(c, next) - instance.dist(prev, next)
}

impl DestroyOperator for WorstRemoval {
    fn name(&self) -> &str {
        "worst_removal"
    }

    fn destroy<R: Rng>(&self, solution: &mut Solution, q: usize, instance: &Instance, rng: &mut R) {
        let mut savings: Vec<(usize, i64)> = solution
            .routes
            .iter()
            .flat_map(|route| {
                (0..route.len()).map(move |pos| (route.path[pos], removal_saving(route, pos, instance)))
            })
            .collect();
        savings.sort_by(|a, b| b.1.cmp(&a.1));

        let mut targets = Vec::with_capacity(q.min(savings.len()));
        while targets.len() < q && !savings.is_empty() {
            let idx = match self.randomization {
                Some(p) => {
                    let y: f64 = rng.random();
                    ((y.powf(p) * savings.len() as f64) as usize).min(savings.len() - 1)
                }
                None => 0,
            };
            targets.push(savings.remove(idx).0);
        }

        for customer in targets {
            solution.unassign(customer);
        }

        solution.remove_empty_routes();
        recompute_solution(solution, instance);
    }
}

/// Removes related (nearby) customers, after Shaw (1998).
///
/// Starts from a random seed customer, then repeatedly picks a random
/// already-removed customer as reference and removes the placed customer
/// closest to it. Ties go to the first customer found in route-then-position
/// order.
///
/// # Reference
///
/// Shaw, P. (1998). "Using Constraint Programming and Local Search Methods
/// to Solve Vehicle Routing Problems", *CP-98*, LNCS 1520, 417-431.
pub struct ShawRemoval;

impl ShawRemoval {
    /// Placed customer nearest to `reference`, first found on ties.
    fn nearest_placed(solution: &Solution, reference: usize, instance: &Instance) -> Option<usize> {
        let mut best: Option<(usize, i64)> = None;
        for &c in solution.routes.iter().flat_map(|r| r.path.iter()) {
            let d = instance.dist(reference, c);
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((c, d));
            }
        }
        best.map(|(c, _)| c)
    }
}

impl DestroyOperator for ShawRemoval {
    fn name(&self) -> &str {
        "shaw_removal"
    }

    fn destroy<R: Rng>(&self, solution: &mut Solution, q: usize, instance: &Instance, rng: &mut R) {
        let placed = solution.num_served();
        if q > 0 && placed > 0 {
            let target = rng.random_range(0..placed);
            let seed = solution
                .routes
                .iter()
                .flat_map(|r| r.path.iter().copied())
                .nth(target);

            if let Some(seed) = seed {
                solution.unassign(seed);
                let mut removed = vec![seed];

                while removed.len() < q && !solution.routes.is_empty() {
                    let reference = removed[rng.random_range(0..removed.len())];
                    let Some(next) = Self::nearest_placed(solution, reference, instance) else {
                        break;
                    };
                    solution.unassign(next);
                    removed.push(next);
                }
            }
        }

        solution.remove_empty_routes();
        recompute_solution(solution, instance);
    }
}

/// Built-in destroy operators, dispatched by variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DestroyKind {
    /// [`RandomRemoval`]
    Random,
    /// [`WorstRemoval`]
    Worst,
    /// [`ShawRemoval`]
    Shaw,
}

impl DestroyKind {
    /// All destroy operators in selector order.
    pub const ALL: [DestroyKind; 3] = [DestroyKind::Random, DestroyKind::Worst, DestroyKind::Shaw];

    /// Short label for progress output.
    pub fn label(self) -> &'static str {
        match self {
            DestroyKind::Random => "Rnd",
            DestroyKind::Worst => "Wst",
            DestroyKind::Shaw => "Shw",
        }
    }
}

/// A destroy operator picked from [`DestroyKind`] with its settings.
#[derive(Debug, Clone)]
pub enum Destroy {
    /// Random removal.
    Random,
    /// Worst removal.
    Worst(WorstRemoval),
    /// Shaw removal.
    Shaw,
}

impl Destroy {
    /// The operator for `kind`; `worst_randomization` configures worst removal.
    pub fn from_kind(kind: DestroyKind, worst_randomization: Option<f64>) -> Self {
        match kind {
            DestroyKind::Random => Destroy::Random,
            DestroyKind::Worst => Destroy::Worst(match worst_randomization {
                Some(p) => WorstRemoval::new().with_randomization(p),
                None => WorstRemoval::new(),
            }),
            DestroyKind::Shaw => Destroy::Shaw,
        }
    }

    /// The variant tag.
    pub fn kind(&self) -> DestroyKind {
        match self {
            Destroy::Random => DestroyKind::Random,
            Destroy::Worst(_) => DestroyKind::Worst,
            Destroy::Shaw => DestroyKind::Shaw,
        }
    }
}

impl DestroyOperator for Destroy {
    fn name(&self) -> &str {
        match self {
            Destroy::Random => RandomRemoval.name(),
            Destroy::Worst(op) => op.name(),
            Destroy::Shaw => ShawRemoval.name(),
        }
    }

    fn destroy<R: Rng>(&self, solution: &mut Solution, q: usize, instance: &Instance, rng: &mut R) {
        match self {
            Destroy::Random => RandomRemoval.destroy(solution, q, instance, rng),
            Destroy::Worst(op) => op.destroy(solution, q, instance, rng),
            Destroy::Shaw => ShawRemoval.destroy(solution, q, instance, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::{check_solution, recompute_solution};
    use crate::models::Node;
    use crate::random::create_rng;

    fn setup() -> Instance {
        Instance::new(
            100,
            vec![
                Node::depot(0.0, 0.0),
                Node::new(1, 1.0, 0.0, 10),
                Node::new(2, 2.0, 0.0, 10),
                Node::new(3, 3.0, 0.0, 10),
                Node::new(4, 4.0, 0.0, 10),
            ],
        )
    }

    fn evaluated(paths: Vec<Vec<usize>>, inst: &Instance) -> Solution {
        let mut sol = Solution::from_paths(paths, vec![]);
        recompute_solution(&mut sol, inst);
        sol
    }

    fn all_customers(sol: &Solution) -> Vec<usize> {
        let mut all: Vec<usize> = sol
            .routes
            .iter()
            .flat_map(|r| r.path.iter().copied())
            .chain(sol.unassigned.iter().copied())
            .collect();
        all.sort();
        all
    }

    #[test]
    fn test_random_removal() {
        let inst = setup();
        let mut sol = evaluated(vec![vec![1, 2, 3, 4]], &inst);
        let mut rng = create_rng(42);
        RandomRemoval.destroy(&mut sol, 2, &inst, &mut rng);
        assert_eq!(sol.unassigned.len(), 2);
        assert_eq!(sol.num_served(), 2);
        assert!(check_solution(&sol, &inst).is_empty());
    }

    #[test]
    fn test_random_removal_stops_when_empty() {
        let inst = setup();
        let mut sol = Solution::from_paths(vec![vec![1], vec![2]], vec![3, 4]);
        recompute_solution(&mut sol, &inst);
        let mut rng = create_rng(7);
        RandomRemoval.destroy(&mut sol, 10, &inst, &mut rng);
        assert_eq!(sol.num_routes(), 0);
        assert_eq!(sol.unassigned.len(), 4);
        assert_eq!(all_customers(&sol), vec![1, 2, 3, 4]);
        assert!(check_solution(&sol, &inst).is_empty());
    }

    #[test]
    fn test_removal_saving() {
        let inst = setup();
        let route = Route::from_path(vec![1, 4, 2]);
        // 1→4→2 vs 1→2: 3 + 2 - 1 = 4
        assert_eq!(removal_saving(&route, 1, &inst), 4);
        // depot→1→4 vs depot→4: 1 + 3 - 4 = 0
        assert_eq!(removal_saving(&route, 0, &inst), 0);
    }

    #[test]
    fn test_worst_removal_takes_worst() {
        let inst = setup();
        let mut sol = evaluated(vec![vec![1, 4, 2, 3]], &inst);
        let mut rng = create_rng(42);
        WorstRemoval::new().destroy(&mut sol, 1, &inst, &mut rng);
        assert_eq!(sol.unassigned, vec![4]);
        assert_eq!(sol.routes[0].path, vec![1, 2, 3]);
        assert!(check_solution(&sol, &inst).is_empty());
    }

    #[test]
    fn test_worst_removal_uses_initial_savings() {
        let inst = setup();
        // Savings on [1, 4, 2, 3]: 1→0, 4→4, 2→2, 3→2
        let mut sol = evaluated(vec![vec![1, 4, 2, 3]], &inst);
        let mut rng = create_rng(42);
        WorstRemoval::new().destroy(&mut sol, 2, &inst, &mut rng);
        assert_eq!(sol.unassigned, vec![4, 2]);
        assert_eq!(sol.routes[0].path, vec![1, 3]);
    }

    #[test]
    fn test_worst_removal_randomized_preserves_customers() {
        let inst = setup();
        let mut sol = evaluated(vec![vec![1, 4], vec![2, 3]], &inst);
        let mut rng = create_rng(3);
        WorstRemoval::new()
            .with_randomization(3.0)
            .destroy(&mut sol, 3, &inst, &mut rng);
        assert_eq!(sol.unassigned.len(), 3);
        assert_eq!(all_customers(&sol), vec![1, 2, 3, 4]);
        assert!(check_solution(&sol, &inst).is_empty());
    }

    #[test]
    fn test_worst_removal_ties_keep_route_order() {
        let inst = setup();
        // Savings: [1, 2] gives 1→0, 2→2; [3, 4] gives 3→0, 4→2
        let mut sol = evaluated(vec![vec![1, 2], vec![3, 4]], &inst);
        let mut rng = create_rng(11);
        WorstRemoval::new().destroy(&mut sol, 1, &inst, &mut rng);
        assert_eq!(sol.unassigned, vec![2]);

        let mut sol = evaluated(vec![vec![1, 2], vec![3, 4]], &inst);
        WorstRemoval::new().destroy(&mut sol, 3, &inst, &mut rng);
        assert_eq!(sol.unassigned, vec![2, 4, 1]);
        assert_eq!(sol.paths(), vec![vec![3]]);
    }

    #[test]
    fn test_shaw_nearest_placed_ties() {
        let inst = setup();
        // 1 and 3 are both one unit from 2
        let sol = Solution::from_paths(vec![vec![1, 3]], vec![2]);
        assert_eq!(ShawRemoval::nearest_placed(&sol, 2, &inst), Some(1));

        // Route order decides, not customer index
        let sol = Solution::from_paths(vec![vec![3], vec![1]], vec![2]);
        assert_eq!(ShawRemoval::nearest_placed(&sol, 2, &inst), Some(3));

        let sol = Solution::from_paths(vec![vec![4, 3, 1]], vec![2]);
        assert_eq!(ShawRemoval::nearest_placed(&sol, 2, &inst), Some(3));
    }

    #[test]
    fn test_shaw_removal_removes_related() {
        let inst = setup();
        let mut sol = evaluated(vec![vec![1, 2, 3, 4]], &inst);
        let mut rng = create_rng(42);
        ShawRemoval.destroy(&mut sol, 2, &inst, &mut rng);
        assert_eq!(sol.unassigned.len(), 2);
        // On a line, the nearest placed customer is always adjacent
        let removed = &sol.unassigned;
        assert_eq!((removed[0] as i64 - removed[1] as i64).abs(), 1);
        assert!(check_solution(&sol, &inst).is_empty());
    }

    #[test]
    fn test_shaw_removal_everything() {
        let inst = setup();
        let mut sol = evaluated(vec![vec![1, 2], vec![3, 4]], &inst);
        let mut rng = create_rng(5);
        ShawRemoval.destroy(&mut sol, 10, &inst, &mut rng);
        assert_eq!(sol.num_routes(), 0);
        assert_eq!(all_customers(&sol), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_zero_removal_is_noop() {
        let inst = setup();
        let original = evaluated(vec![vec![1, 2], vec![3, 4]], &inst);
        let mut rng = create_rng(1);
        for kind in DestroyKind::ALL {
            let mut sol = original.clone();
            Destroy::from_kind(kind, None).destroy(&mut sol, 0, &inst, &mut rng);
            assert_eq!(sol, original, "{kind:?}");
        }
    }

    #[test]
    fn test_removal_preserves_all_customers() {
        let inst = setup();
        let mut rng = create_rng(42);
        for kind in DestroyKind::ALL {
            let mut sol = evaluated(vec![vec![1, 2], vec![3, 4]], &inst);
            Destroy::from_kind(kind, None).destroy(&mut sol, 2, &inst, &mut rng);
            assert_eq!(all_customers(&sol), vec![1, 2, 3, 4], "{kind:?}");
            assert_eq!(sol.unassigned.len(), 2, "{kind:?}");
        }
    }

    #[test]
    fn test_destroy_labels() {
        assert_eq!(DestroyKind::Random.label(), "Rnd");
        assert_eq!(Destroy::from_kind(DestroyKind::Worst, None).name(), "worst_removal");
        assert_eq!(Destroy::Shaw.kind(), DestroyKind::Shaw);
    }
}

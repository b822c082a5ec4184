//! ALNS execution loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use serde::Serialize;

use crate::constructive::nearest_neighbor;
use crate::evaluation::recompute_solution;
use crate::models::{Instance, Solution};
use crate::random::create_rng;

use super::acceptance::{Outcome, SimulatedAnnealing};
use super::config::AlnsConfig;
use super::destroy::{Destroy, DestroyKind};
use super::repair::RepairKind;
use super::selection::AdaptiveWeights;
use super::types::{DestroyOperator, RepairOperator};

/// A new best solution found during the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Improvement {
    /// Zero-based iteration that produced it.
    pub iteration: usize,
    /// Its total cost.
    pub cost: i64,
    /// Destroy operator used.
    pub destroy: DestroyKind,
    /// Repair operator used.
    pub repair: RepairKind,
}

/// Result of an ALNS optimization run.
#[derive(Debug, Clone, Serialize)]
pub struct AlnsResult {
    /// The best solution found.
    pub best: Solution,

    /// Cost of the best solution.
    pub best_cost: i64,

    /// Cost of the nearest-neighbor starting solution.
    pub initial_cost: i64,

    /// Seed the generator was created from.
    pub seed: u64,

    /// Iterations actually performed.
    pub iterations: usize,

    /// Number of new global bests found.
    pub improvements: usize,

    /// Final temperature.
    pub final_temperature: f64,

    /// Number of temperature reheats.
    pub reheats: usize,

    /// Whether the wall-clock budget ended the run.
    pub time_limit_hit: bool,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Final destroy operator weights, in [`DestroyKind::ALL`] order.
    pub destroy_weights: Vec<f64>,

    /// Final repair operator weights, in [`RepairKind::ALL`] order.
    pub repair_weights: Vec<f64>,

    /// Wall-clock time of the run.
    pub elapsed: Duration,

    /// Best cost at the start and at the end of every segment.
    pub cost_history: Vec<i64>,
}

/// Executes the ALNS algorithm on a CVRP instance.
///
/// # Examples
///
/// ```
/// use u_cvrp::alns::{AlnsConfig, AlnsRunner};
/// use u_cvrp::models::{Instance, Node};
///
/// let instance = Instance::new(
///     10,
///     vec![
///         Node::depot(0.0, 0.0),
///         Node::new(1, 3.0, 0.0, 4),
///         Node::new(2, 0.0, 4.0, 4),
///         Node::new(3, 3.0, 4.0, 4),
///     ],
/// );
/// let config = AlnsConfig::default().with_max_iterations(200).with_seed(7);
/// let result = AlnsRunner::run(&instance, &config).unwrap();
///
/// assert!(result.best.is_complete());
/// assert!(result.best_cost <= result.initial_cost);
/// ```
pub struct AlnsRunner;

impl AlnsRunner {
    /// Runs ALNS optimization.
    pub fn run(instance: &Instance, config: &AlnsConfig) -> Result<AlnsResult, String> {
        Self::run_with_cancel(instance, config, None)
    }

    /// Runs ALNS with an optional cancellation token.
    ///
    /// The token is checked at the top of every iteration.
    pub fn run_with_cancel(
        instance: &Instance,
        config: &AlnsConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<AlnsResult, String> {
        Self::run_observed(instance, config, cancel, |_| {})
    }

    /// Runs ALNS, calling `on_new_best` every time the best solution improves.
    pub fn run_observed<F>(
        instance: &Instance,
        config: &AlnsConfig,
        cancel: Option<Arc<AtomicBool>>,
        on_new_best: F,
    ) -> Result<AlnsResult, String>
    where
        F: FnMut(&Improvement),
    {
        Self::run_from(instance, config, nearest_neighbor(instance), cancel, on_new_best)
    }

    /// Runs ALNS from a caller-supplied starting solution.
    ///
    /// `initial` is re-evaluated before use and must not serve a customer
    /// twice.
    pub fn run_from<F>(
        instance: &Instance,
        config: &AlnsConfig,
        initial: Solution,
        cancel: Option<Arc<AtomicBool>>,
        mut on_new_best: F,
    ) -> Result<AlnsResult, String>
    where
        F: FnMut(&Improvement),
    {
        config.validate()?;
        let start = Instant::now();

        let seed = config.seed.unwrap_or_else(rand::random);
        log::info!(
            "ALNS start: {} customers, capacity {}, seed {}",
            instance.num_customers(),
            instance.capacity(),
            seed
        );
        let mut rng = create_rng(seed);

        let destroy_ops: Vec<Destroy> = DestroyKind::ALL
            .iter()
            .map(|&kind| Destroy::from_kind(kind, config.worst_randomization))
            .collect();
        let repair_ops = RepairKind::ALL;

        let mut destroy_weights = AdaptiveWeights::new(destroy_ops.len());
        let mut repair_weights = AdaptiveWeights::new(repair_ops.len());

        let mut current = initial;
        recompute_solution(&mut current, instance);
        let initial_cost = current.total_cost;
        let mut best = current.clone();

        let mut sa =
            SimulatedAnnealing::new(initial_cost, config.start_temp_factor, config.cooling_rate)
                .with_reheat(config.min_temperature, config.reheat_factor);
        let (min_q, max_q) = config.removal_bounds(instance.dimension());

        let mut iterations = 0usize;
        let mut improvements = 0usize;
        let mut cancelled = false;
        let mut time_limit_hit = false;
        let mut cost_history = vec![best.total_cost];

        for iteration in 0..config.max_iterations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }
            if let Some(limit) = config.time_limit {
                if start.elapsed() > limit {
                    time_limit_hit = true;
                    break;
                }
            }

            let d_idx = destroy_weights.select(&mut rng);
            let r_idx = repair_weights.select(&mut rng);
            let q = rng.random_range(min_q..=max_q);

            let mut candidate = current.clone();
            destroy_ops[d_idx].destroy(&mut candidate, q, instance, &mut rng);
            repair_ops[r_idx].repair(&mut candidate, instance, &mut rng);

            let outcome = if candidate.is_complete() {
                sa.decide(
                    candidate.total_cost,
                    current.total_cost,
                    best.total_cost,
                    &mut rng,
                )
            } else {
                Outcome::Rejected
            };

            let score = match outcome {
                Outcome::NewBest => config.score_new_best,
                Outcome::Improved => config.score_improved,
                Outcome::Accepted => config.score_accepted,
                Outcome::Rejected => 0.0,
            };

            if outcome == Outcome::NewBest {
                best = candidate.clone();
                improvements += 1;
                let event = Improvement {
                    iteration,
                    cost: best.total_cost,
                    destroy: destroy_ops[d_idx].kind(),
                    repair: repair_ops[r_idx],
                };
                log::info!(
                    "iter {}: new best {} [{}+{}]",
                    iteration,
                    event.cost,
                    event.destroy.label(),
                    event.repair.label()
                );
                on_new_best(&event);
            }
            if outcome.is_accepted() {
                current = candidate;
            }

            destroy_weights.record(d_idx, score);
            repair_weights.record(r_idx, score);

            if (iteration + 1) % config.segment_length == 0 {
                destroy_weights.update(config.reaction_factor, config.min_weight);
                repair_weights.update(config.reaction_factor, config.min_weight);
                log::debug!(
                    "iter {}: destroy weights {:?}, repair weights {:?}",
                    iteration,
                    destroy_weights.weights(),
                    repair_weights.weights()
                );
                cost_history.push(best.total_cost);
            }

            if sa.cool(current.total_cost) {
                log::debug!(
                    "iter {}: reheated to {:.3}",
                    iteration,
                    sa.temperature()
                );
            }
            iterations += 1;
        }

        if cost_history.last().is_none_or(|&last| last != best.total_cost) {
            cost_history.push(best.total_cost);
        }

        let elapsed = start.elapsed();
        log::info!(
            "ALNS done: best {} after {} iterations in {:.2?}{}",
            best.total_cost,
            iterations,
            elapsed,
            if time_limit_hit {
                " (time limit)"
            } else if cancelled {
                " (cancelled)"
            } else {
                ""
            }
        );

        Ok(AlnsResult {
            best_cost: best.total_cost,
            best,
            initial_cost,
            seed,
            iterations,
            improvements,
            final_temperature: sa.temperature(),
            reheats: sa.reheats(),
            time_limit_hit,
            cancelled,
            destroy_weights: destroy_weights.weights(),
            repair_weights: repair_weights.weights(),
            elapsed,
            cost_history,
        })
    }
}

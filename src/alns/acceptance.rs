//! Simulated annealing acceptance criterion.

use rand::Rng;
use serde::Serialize;

/// How a candidate solution was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// Beat the best known solution (sigma_1).
    NewBest,
    /// Beat the current solution only (sigma_2).
    Improved,
    /// Worse than current, accepted by the Metropolis test (sigma_3).
    Accepted,
    /// Discarded.
    Rejected,
}

impl Outcome {
    /// Returns `true` if the candidate replaces the current solution.
    pub fn is_accepted(self) -> bool {
        !matches!(self, Outcome::Rejected)
    }
}

/// Metropolis acceptance with geometric cooling and reheating.
///
/// The temperature starts at `start_temp_factor × initial_cost` and is
/// multiplied by `cooling_rate` every iteration. Once it falls below
/// `min_temperature` it is reset to `reheat_factor × current_cost`, so worse
/// moves never become impossible.
///
/// # Examples
///
/// ```
/// use u_cvrp::alns::{Outcome, SimulatedAnnealing};
/// use u_cvrp::random::create_rng;
///
/// let mut sa = SimulatedAnnealing::new(1000, 0.05, 0.9);
/// assert!((sa.temperature() - 50.0).abs() < 1e-12);
///
/// let mut rng = create_rng(42);
/// assert_eq!(sa.decide(900, 1000, 950, &mut rng), Outcome::NewBest);
/// assert_eq!(sa.decide(960, 1000, 950, &mut rng), Outcome::Improved);
///
/// sa.cool(1000);
/// assert!((sa.temperature() - 45.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct SimulatedAnnealing {
    temperature: f64,
    cooling_rate: f64,
    min_temperature: f64,
    reheat_factor: f64,
    reheats: usize,
}

impl SimulatedAnnealing {
    /// Temperature below which the schedule reheats.
    pub const DEFAULT_MIN_TEMPERATURE: f64 = 0.001;
    /// Reheat temperature as a fraction of the current cost.
    pub const DEFAULT_REHEAT_FACTOR: f64 = 0.001;

    /// Creates a schedule starting at `start_temp_factor × initial_cost`.
    pub fn new(initial_cost: i64, start_temp_factor: f64, cooling_rate: f64) -> Self {
        Self {
            temperature: initial_cost as f64 * start_temp_factor,
            cooling_rate,
            min_temperature: Self::DEFAULT_MIN_TEMPERATURE,
            reheat_factor: Self::DEFAULT_REHEAT_FACTOR,
            reheats: 0,
        }
    }

    /// Overrides the reheat floor and reheat factor.
    pub fn with_reheat(mut self, min_temperature: f64, reheat_factor: f64) -> Self {
        self.min_temperature = min_temperature;
        self.reheat_factor = reheat_factor;
        self
    }

    /// Current temperature.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Number of reheats so far.
    pub fn reheats(&self) -> usize {
        self.reheats
    }

    /// Probability of accepting a candidate `delta` worse than current.
    pub fn acceptance_probability(&self, delta: i64) -> f64 {
        if delta <= 0 {
            return 1.0;
        }
        if self.temperature <= 0.0 {
            return 0.0;
        }
        (-(delta as f64) / self.temperature).exp()
    }

    /// Classifies a complete candidate against the current and best costs.
    ///
    /// Only a candidate that is no better than current consumes a random
    /// draw.
    pub fn decide<R: Rng>(&self, candidate: i64, current: i64, best: i64, rng: &mut R) -> Outcome {
        if candidate < best {
            Outcome::NewBest
        } else if candidate < current {
            Outcome::Improved
        } else {
            let p = self.acceptance_probability(candidate - current);
            if rng.random_range(0.0..1.0) < p {
                Outcome::Accepted
            } else {
                Outcome::Rejected
            }
        }
    }

    /// Advances the schedule by one iteration.
    ///
    /// Returns `true` if the temperature was reheated.
    pub fn cool(&mut self, current_cost: i64) -> bool {
        self.temperature *= self.cooling_rate;
        if self.temperature < self.min_temperature {
            self.temperature = current_cost as f64 * self.reheat_factor;
            self.reheats += 1;
            return true;
        }
        false
    }
}

//! ALNS configuration.

use std::time::Duration;

use serde::Serialize;

/// Configuration for the CVRP ALNS search.
///
/// # Scoring
///
/// At each iteration the selected destroy/repair operator pair receives a score:
/// - `score_new_best` (sigma_1): found a new global best solution
/// - `score_improved` (sigma_2): improved the current solution
/// - `score_accepted` (sigma_3): accepted a worse solution (via SA criterion)
///
/// These scores are accumulated over a *segment* of `segment_length` iterations,
/// then used to update operator weights via exponential smoothing with
/// `reaction_factor` (rho).
///
/// # Acceptance Criterion
///
/// Worse solutions are accepted with probability `exp(-delta / T)`. `T`
/// starts at `start_temp_factor × initial cost`, decays geometrically by
/// `cooling_rate` each iteration, and is reheated to
/// `reheat_factor × current cost` whenever it drops below `min_temperature`.
///
/// # Neighborhood Size
///
/// Each iteration removes `q` customers, drawn uniformly from
/// `[max(1, ⌊n·min_removal_fraction⌋), max(2, ⌊n·max_removal_fraction⌋)]`
/// where `n` is the instance dimension.
///
/// # References
///
/// Ropke & Pisinger (2006), Section 3
///
/// # Examples
///
/// ```
/// use u_cvrp::alns::AlnsConfig;
///
/// let config = AlnsConfig::default()
///     .with_max_iterations(5000)
///     .with_segment_length(100)
///     .with_scores(33.0, 9.0, 13.0)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct AlnsConfig {
    /// Maximum number of iterations.
    pub max_iterations: usize,

    /// Wall-clock budget, checked at the top of every iteration.
    pub time_limit: Option<Duration>,

    /// Segment length for weight updates.
    pub segment_length: usize,

    /// Score for finding a new global best (sigma_1).
    pub score_new_best: f64,

    /// Score for improving the current solution (sigma_2).
    pub score_improved: f64,

    /// Score for accepting a worse solution (sigma_3).
    pub score_accepted: f64,

    /// Reaction factor (rho) for weight updates, in (0, 1].
    pub reaction_factor: f64,

    /// Minimum operator weight (prevents operators from becoming unused).
    pub min_weight: f64,

    /// Lower removal fraction of the instance dimension.
    pub min_removal_fraction: f64,

    /// Upper removal fraction of the instance dimension.
    pub max_removal_fraction: f64,

    /// Initial temperature as a fraction of the initial solution cost.
    pub start_temp_factor: f64,

    /// Cooling rate for SA acceptance (geometric), in (0, 1).
    pub cooling_rate: f64,

    /// Temperature below which the schedule reheats.
    pub min_temperature: f64,

    /// Reheat temperature as a fraction of the current cost.
    pub reheat_factor: f64,

    /// Randomization power for worst removal; `None` is strict worst-first.
    pub worst_randomization: Option<f64>,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for AlnsConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50_000,
            time_limit: Some(Duration::from_secs(120)),
            segment_length: 100,
            score_new_best: 33.0,
            score_improved: 9.0,
            score_accepted: 13.0,
            reaction_factor: 0.1,
            min_weight: 0.01,
            min_removal_fraction: 0.10,
            max_removal_fraction: 0.40,
            start_temp_factor: 0.05,
            cooling_rate: 0.9997,
            min_temperature: 0.001,
            reheat_factor: 0.001,
            worst_randomization: None,
            seed: None,
        }
    }
}

impl AlnsConfig {
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }

    pub fn with_segment_length(mut self, n: usize) -> Self {
        self.segment_length = n.max(1);
        self
    }

    pub fn with_scores(mut self, new_best: f64, improved: f64, accepted: f64) -> Self {
        self.score_new_best = new_best;
        self.score_improved = improved;
        self.score_accepted = accepted;
        self
    }

    pub fn with_reaction_factor(mut self, rho: f64) -> Self {
        self.reaction_factor = rho;
        self
    }

    pub fn with_removal_fraction(mut self, min: f64, max: f64) -> Self {
        self.min_removal_fraction = min.clamp(0.0, 1.0);
        self.max_removal_fraction = max.clamp(self.min_removal_fraction, 1.0);
        self
    }

    pub fn with_temperature(mut self, start_factor: f64, cooling_rate: f64) -> Self {
        self.start_temp_factor = start_factor;
        self.cooling_rate = cooling_rate;
        self
    }

    pub fn with_reheat(mut self, min_temperature: f64, reheat_factor: f64) -> Self {
        self.min_temperature = min_temperature;
        self.reheat_factor = reheat_factor;
        self
    }

    pub fn with_worst_randomization(mut self, p: Option<f64>) -> Self {
        self.worst_randomization = p;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Removal count bounds `(min_q, max_q)` for an instance of `dimension`
    /// nodes, with `min_q <= max_q`.
    pub fn removal_bounds(&self, dimension: usize) -> (usize, usize) {
        let n = dimension as f64;
        let min_q = ((n * self.min_removal_fraction) as usize).max(1);
        let max_q = ((n * self.max_removal_fraction) as usize).max(2);
        (min_q, max_q.max(min_q))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_iterations == 0 {
            return Err("max_iterations must be positive".into());
        }
        if self.segment_length == 0 {
            return Err("segment_length must be positive".into());
        }
        if self.reaction_factor <= 0.0 || self.reaction_factor > 1.0 {
            return Err(format!(
                "reaction_factor must be in (0, 1], got {}",
                self.reaction_factor
            ));
        }
        if self.cooling_rate <= 0.0 || self.cooling_rate >= 1.0 {
            return Err(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            ));
        }
        if self.start_temp_factor < 0.0 {
            return Err("start_temp_factor must be non-negative".into());
        }
        if self.min_temperature <= 0.0 {
            return Err("min_temperature must be positive".into());
        }
        if self.min_weight < 0.0 {
            return Err("min_weight must be non-negative".into());
        }
        if self.min_removal_fraction > self.max_removal_fraction {
            return Err("min_removal_fraction must be <= max_removal_fraction".into());
        }
        if let Some(p) = self.worst_randomization {
            if p < 1.0 {
                return Err(format!("worst_randomization must be >= 1, got {p}"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AlnsConfig::default();
        assert_eq!(config.max_iterations, 50_000);
        assert_eq!(config.segment_length, 100);
        assert_eq!(config.time_limit, Some(Duration::from_secs(120)));
        assert!((config.score_accepted - 13.0).abs() < 1e-10);
        assert!((config.cooling_rate - 0.9997).abs() < 1e-10);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_validate_ok() {
        assert!(AlnsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_bad_iterations() {
        let config = AlnsConfig {
            max_iterations: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_reaction_factor() {
        assert!(AlnsConfig::default()
            .with_reaction_factor(0.0)
            .validate()
            .is_err());
        assert!(AlnsConfig::default()
            .with_reaction_factor(1.5)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_bad_cooling_rate() {
        assert!(AlnsConfig::default()
            .with_temperature(0.05, 0.0)
            .validate()
            .is_err());
        assert!(AlnsConfig::default()
            .with_temperature(0.05, 1.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_bad_worst_randomization() {
        let config = AlnsConfig::default().with_worst_randomization(Some(0.5));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_removal_bounds() {
        let config = AlnsConfig::default();
        assert_eq!(config.removal_bounds(100), (10, 40));
        assert_eq!(config.removal_bounds(4), (1, 2));
        assert_eq!(config.removal_bounds(1), (1, 2));
        let wide = AlnsConfig::default().with_removal_fraction(0.5, 0.5);
        assert_eq!(wide.removal_bounds(3), (1, 2));
        assert_eq!(wide.removal_bounds(10), (5, 5));
    }

    #[test]
    fn test_builder_chain() {
        let config = AlnsConfig::default()
            .with_max_iterations(500)
            .with_time_limit(None)
            .with_segment_length(50)
            .with_scores(10.0, 5.0, 1.0)
            .with_reaction_factor(0.2)
            .with_removal_fraction(0.2, 0.5)
            .with_temperature(0.1, 0.999)
            .with_reheat(0.01, 0.002)
            .with_seed(42);

        assert_eq!(config.max_iterations, 500);
        assert!(config.time_limit.is_none());
        assert_eq!(config.segment_length, 50);
        assert!((config.score_new_best - 10.0).abs() < 1e-10);
        assert!((config.min_removal_fraction - 0.2).abs() < 1e-10);
        assert!((config.max_removal_fraction - 0.5).abs() < 1e-10);
        assert!((config.reheat_factor - 0.002).abs() < 1e-10);
        assert_eq!(config.seed, Some(42));
    }
}

//! Adaptive operator selection.
//!
//! Operators are drawn by roulette wheel on their weights. Each use records
//! the iteration's score; at the end of every segment the weights move
//! toward the per-use average score by exponential smoothing.

use rand::Rng;
use serde::Serialize;

/// Selects an index with probability proportional to its weight.
///
/// Draws `u ~ U[0, Σw)` and returns the first index whose cumulative weight
/// exceeds `u`. Falls back to the last index on rounding, and to 0 when the
/// weights are empty or sum to zero.
///
/// # Examples
///
/// ```
/// use u_cvrp::alns::select_operator;
/// use u_cvrp::random::create_rng;
///
/// let mut rng = create_rng(42);
/// let idx = select_operator(&[0.0, 1.0, 0.0], &mut rng);
/// assert_eq!(idx, 1);
/// ```
pub fn select_operator<R: Rng>(weights: &[f64], rng: &mut R) -> usize {
    let total: f64 = weights.iter().sum();
    if weights.is_empty() || total <= 0.0 {
        return 0;
    }

    let roll = rng.random_range(0.0..total);
    let mut acc = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        acc += w;
        if roll < acc {
            return i;
        }
    }
    weights.len() - 1
}

/// Tracks per-operator statistics for adaptive weight updates.
#[derive(Debug, Clone, Serialize)]
pub struct OperatorStats {
    /// Current selection weight.
    pub weight: f64,
    /// Score accumulated in the current segment.
    pub segment_score: f64,
    /// Uses in the current segment.
    pub segment_uses: usize,
}

impl OperatorStats {
    fn new() -> Self {
        Self {
            weight: 1.0,
            segment_score: 0.0,
            segment_uses: 0,
        }
    }

    fn record(&mut self, score: f64) {
        self.segment_score += score;
        self.segment_uses += 1;
    }

    /// Update weight using exponential smoothing at end of segment.
    ///
    /// w_new = w * (1 - rho) + rho * (pi_j / theta_j)
    ///
    /// where pi_j = accumulated score, theta_j = times used in segment.
    /// Unused operators keep their weight.
    ///
    /// Reference: Ropke & Pisinger (2006), Equation (1)
    fn update_weight(&mut self, reaction_factor: f64, min_weight: f64) {
        if self.segment_uses > 0 {
            let avg_score = self.segment_score / self.segment_uses as f64;
            self.weight = self.weight * (1.0 - reaction_factor) + avg_score * reaction_factor;
            self.weight = self.weight.max(min_weight);
            self.segment_score = 0.0;
            self.segment_uses = 0;
        }
    }
}

/// Weights and segment statistics for one family of operators.
///
/// # Examples
///
/// ```
/// use u_cvrp::alns::AdaptiveWeights;
///
/// let mut weights = AdaptiveWeights::new(2);
/// weights.record(0, 33.0);
/// weights.update(0.1, 0.0);
/// assert!((weights.weights()[0] - (0.9 + 3.3)).abs() < 1e-12);
/// assert_eq!(weights.weights()[1], 1.0);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct AdaptiveWeights {
    stats: Vec<OperatorStats>,
}

impl AdaptiveWeights {
    /// Creates `n` operators with equal weight 1.
    pub fn new(n: usize) -> Self {
        Self {
            stats: (0..n).map(|_| OperatorStats::new()).collect(),
        }
    }

    /// Draws an operator index by roulette wheel.
    pub fn select<R: Rng>(&self, rng: &mut R) -> usize {
        select_operator(&self.weights(), rng)
    }

    /// Credits operator `idx` with one use and `score`.
    pub fn record(&mut self, idx: usize, score: f64) {
        self.stats[idx].record(score);
    }

    /// Ends the segment: smooths weights of used operators and resets their
    /// segment statistics.
    pub fn update(&mut self, reaction_factor: f64, min_weight: f64) {
        for stat in &mut self.stats {
            stat.update_weight(reaction_factor, min_weight);
        }
    }

    /// Current weights in operator order.
    pub fn weights(&self) -> Vec<f64> {
        self.stats.iter().map(|s| s.weight).collect()
    }

    /// Per-operator statistics.
    pub fn stats(&self) -> &[OperatorStats] {
        &self.stats
    }

    /// Number of operators.
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    /// Returns `true` if there are no operators.
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

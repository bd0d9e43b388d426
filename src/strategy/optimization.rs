// src/strategy/optimization.rs

//! Service-level math and the budgeted linear program behind replenishment.

/// z used at or above the 95% service cutover.
const Z_HIGH_SERVICE: f64 = 1.64;
/// z used below it.
const Z_STANDARD_SERVICE: f64 = 1.28;
const HIGH_SERVICE_CUTOVER: f64 = 0.95;

/// How a target service level is turned into a safety factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceLevelLookup {
    /// 1.64 at or above 95% service, 1.28 below. Keeps plans comparable with
    /// earlier runs.
    #[default]
    TwoTier,
    /// Standard normal quantile of the target service level.
    InverseNormal,
}

impl ServiceLevelLookup {
    pub fn safety_factor(self, target_service: f64) -> f64 {
        match self {
            ServiceLevelLookup::TwoTier => {
                if target_service >= HIGH_SERVICE_CUTOVER {
                    Z_HIGH_SERVICE
                } else {
                    Z_STANDARD_SERVICE
                }
            }
            ServiceLevelLookup::InverseNormal => inverse_normal_cdf(target_service),
        }
    }
}

/// Approximate Inverse Cumulative Distribution Function (Quantile function) for Standard Normal Distribution.
///
/// Based on Abramowitz and Stegun formula 26.2.23.
/// The absolute error is less than 4.5e-4.
pub fn inverse_normal_cdf(p: f64) -> f64 {
    // Cap at a reasonable sigma
    if p >= 1.0 {
        return 5.0;
    }
    if p <= 0.0 {
        return -5.0;
    }
    if p == 0.5 {
        return 0.0;
    }

    // Formula is valid for 0 < p <= 0.5; mirror for the upper half.
    let q = if p < 0.5 { p } else { 1.0 - p };

    let t = (-2.0 * q.ln()).sqrt();

    let c0 = 2.515517;
    let c1 = 0.802853;
    let c2 = 0.010328;

    let d1 = 1.432788;
    let d2 = 0.189269;
    let d3 = 0.001308;

    let numerator = c0 + c1 * t + c2 * t * t;
    let denominator = 1.0 + d1 * t + d2 * t * t + d3 * t * t * t;

    let x = t - (numerator / denominator);

    if p < 0.5 {
        -x
    } else {
        x
    }
}

/// Result of [`solve_budgeted_lp`].
#[derive(Debug, Clone, PartialEq)]
pub enum LpOutcome {
    Optimal { x: Vec<f64>, objective: f64 },
    /// The lower bounds alone already exceed the budget.
    Infeasible,
    /// The objective decreases without limit.
    Unbounded,
    /// Malformed input (length mismatch, non-finite or negative coefficients).
    Failed(String),
}

/// Solves
///
/// ```text
/// minimize    c · x
/// subject to  a · x <= budget
///             x_i   >= lower_i
/// ```
///
/// with `a >= 0` and no upper bounds. Shifting `y = x - lower` turns this into
/// a single-constraint knapsack relaxation, whose optimal vertex is found
/// directly: stay at the lower bounds unless some cost is negative, in which
/// case the whole slack goes to the variable with the best cost per unit of
/// budget. Ties go to the lowest index.
pub fn solve_budgeted_lp(costs: &[f64], weights: &[f64], budget: f64, lower: &[f64]) -> LpOutcome {
    let n = costs.len();
    if weights.len() != n || lower.len() != n {
        return LpOutcome::Failed(format!(
            "coefficient lengths differ: costs {}, weights {}, bounds {}",
            n,
            weights.len(),
            lower.len()
        ));
    }
    if budget.is_nan() {
        return LpOutcome::Failed("budget is NaN".to_string());
    }
    for i in 0..n {
        if !costs[i].is_finite() || !weights[i].is_finite() || !lower[i].is_finite() {
            return LpOutcome::Failed(format!("non-finite coefficient at index {}", i));
        }
        if weights[i] < 0.0 {
            return LpOutcome::Failed(format!("negative constraint weight at index {}", i));
        }
    }

    let committed: f64 = weights.iter().zip(lower).map(|(a, l)| a * l).sum();
    let slack = budget - committed;
    let tolerance = 1e-9 * budget.abs().max(committed.abs()).max(1.0);
    if slack < -tolerance {
        return LpOutcome::Infeasible;
    }

    let mut x = lower.to_vec();

    // Variables whose cost is negative improve the objective as they grow.
    let mut best: Option<(usize, f64)> = None;
    for i in 0..n {
        if costs[i] >= 0.0 {
            continue;
        }
        if weights[i] == 0.0 {
            return LpOutcome::Unbounded;
        }
        let ratio = costs[i] / weights[i];
        if best.map_or(true, |(_, r)| ratio < r) {
            best = Some((i, ratio));
        }
    }
    if let Some((i, _)) = best {
        if slack.is_infinite() {
            return LpOutcome::Unbounded;
        }
        x[i] += slack.max(0.0) / weights[i];
    }

    let objective = costs.iter().zip(&x).map(|(c, v)| c * v).sum();
    LpOutcome::Optimal { x, objective }
}

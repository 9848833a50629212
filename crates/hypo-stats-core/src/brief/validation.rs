//! Adaptive validation policy

use crate::types::{CategoricalStats, DistributionStats, QualityStats, TemporalStats, ValidationStats};

const ALPHA_FLOOR: f64 = 0.001;
const ALPHA_NON_NORMAL: f64 = 0.005;
const ALPHA_DEGRADED: f64 = 0.01;

const BASE_ITERATIONS: usize = 2500;
const NOISY_ITERATIONS: usize = 10_000;
const SPARSE_ITERATIONS: usize = 5000;

const SPARSE_THRESHOLD: f64 = 0.5;
const NOISY_THRESHOLD: f64 = 0.7;

/// Lag-1 autocorrelation above which resampling must respect dependence
const BOOTSTRAP_AUTOCORR: f64 = 0.3;
const BOOTSTRAP_SAMPLES: usize = 2000;

/// Validation policy derived from the already computed sections
///
/// The significance level starts at the floor and is raised, never summed,
/// by each degradation trigger.
pub fn compute_validation(
    distribution: &DistributionStats,
    quality: &QualityStats,
    categorical: Option<&CategoricalStats>,
    temporal: Option<&TemporalStats>,
) -> ValidationStats {
    let sparse = quality.sparsity_ratio > SPARSE_THRESHOLD;
    let noisy = quality.noise_coefficient > NOISY_THRESHOLD;

    let mut alpha = ALPHA_FLOOR;
    if !distribution.is_normal {
        alpha = alpha.max(ALPHA_NON_NORMAL);
    }
    if sparse || noisy {
        alpha = alpha.max(ALPHA_DEGRADED);
    }

    let optimal_iterations = if noisy {
        NOISY_ITERATIONS
    } else if sparse {
        SPARSE_ITERATIONS
    } else {
        BASE_ITERATIONS
    };

    let is_categorical = categorical.map(|c| c.is_categorical).unwrap_or(false);
    let requires_bootstrap = temporal
        .map(|t| t.autocorr_lag1 > BOOTSTRAP_AUTOCORR)
        .unwrap_or(false);

    ValidationStats {
        recommended_alpha: alpha,
        optimal_iterations,
        use_non_parametric: !distribution.is_normal || is_categorical,
        requires_bootstrap,
        bootstrap_samples: if requires_bootstrap { BOOTSTRAP_SAMPLES } else { 0 },
    }
}

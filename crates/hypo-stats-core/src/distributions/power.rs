//! Power analysis for the two-sample t-test

use super::pvalues::{normal_cdf, normal_quantile};

fn valid_alpha(alpha: f64) -> f64 {
    if alpha > 0.0 && alpha < 1.0 {
        alpha
    } else {
        0.05
    }
}

/// Power of a two-sided, two-sample t-test at standardized effect `effect_size`
///
/// Uses the normal approximation when df > 30 and a conservative 0.5 below that.
pub fn t_test_power(effect_size: f64, alpha: f64, n1: usize, n2: usize) -> f64 {
    if n1 == 0 || n2 == 0 || effect_size.is_nan() {
        return 0.0;
    }

    let df = (n1 + n2) as f64 - 2.0;
    if df <= 30.0 {
        return 0.5;
    }

    let (n1, n2) = (n1 as f64, n2 as f64);
    let non_centrality = effect_size.abs() * (n1 * n2 / (n1 + n2)).sqrt();
    let z_critical = normal_quantile(1.0 - valid_alpha(alpha) / 2.0);
    normal_cdf(non_centrality - z_critical)
}

/// Per-group sample size needed to reach `power` at effect `effect_size`
///
/// n = 2 (z_{1-alpha/2} + z_power)^2 / d^2, rounded up.
///
/// A zero effect has no finite answer; 100 per group is returned instead.
pub fn sample_size_t_test(effect_size: f64, power: f64, alpha: f64) -> (usize, usize) {
    let z_alpha = normal_quantile(1.0 - valid_alpha(alpha) / 2.0);
    let z_beta = normal_quantile(power);

    let denominator = effect_size * effect_size;
    if denominator == 0.0 || !denominator.is_finite() {
        return (100, 100);
    }

    let per_group = (2.0 * (z_alpha + z_beta).powi(2) / denominator).ceil().max(1.0) as usize;
    (per_group, per_group)
}

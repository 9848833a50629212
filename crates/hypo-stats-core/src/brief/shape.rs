//! Distribution shape: skewness, kurtosis and normality
//!
//! Normality uses D'Agostino's K^2 for n >= 8: the sample moment ratios
//! sqrt(b1) and b2 are mapped to Z1 through the log-normal approximation and
//! to Z2 through Anscombe-Glynn, and K^2 = Z1^2 + Z2^2 is compared against
//! chi-square(2). Between 3 and 7 observations a combined
//! |skew| + |b2 - 3| / 2 statistic is used. Both tests read b2 directly,
//! never the reported (bias-corrected) kurtosis.

use super::summary::{mean, population_std};
use crate::distributions::chi_square_p_value;
use crate::types::DistributionStats;

/// Smallest sample for the K^2 test
const DAGOSTINO_MIN_N: usize = 8;

const NORMALITY_ALPHA: f64 = 0.05;

/// Returned whenever the normality path hits a degenerate quantity
const NOT_NORMAL: (bool, f64) = (false, 1.0);

/// Adjusted Fisher-Pearson skewness; 0.0 when n < 3 or the spread is zero
pub(crate) fn skewness(data: &[f64], mean: f64, std_dev: f64) -> f64 {
    if data.len() < 3 || std_dev == 0.0 || !std_dev.is_finite() {
        return 0.0;
    }

    let n = data.len() as f64;
    let cubed: f64 = data.iter().map(|x| ((x - mean) / std_dev).powi(3)).sum();
    cubed / n * (n * (n - 1.0)).sqrt() / (n - 2.0)
}

/// Total kurtosis (not excess) with the (n-1)/((n-2)(n-3)) + 6/(n+1) correction
///
/// 3.0 when n < 4 or the spread is zero.
pub(crate) fn kurtosis(data: &[f64], mean: f64, std_dev: f64) -> f64 {
    if data.len() < 4 || std_dev == 0.0 || !std_dev.is_finite() {
        return 3.0;
    }

    let n = data.len() as f64;
    let fourth: f64 = data.iter().map(|x| ((x - mean) / std_dev).powi(4)).sum();
    let moment = fourth / n;
    let correction = (n - 1.0) / ((n - 2.0) * (n - 3.0));
    moment * correction + 6.0 / (n + 1.0) + 3.0
}

/// Standardized third and fourth moments `(sqrt(b1), b2)`, both dividing by n
fn moment_ratios(data: &[f64], mean: f64, std_dev: f64) -> (f64, f64) {
    let n = data.len() as f64;
    let (mut third, mut fourth) = (0.0, 0.0);
    for x in data {
        let z = (x - mean) / std_dev;
        let z2 = z * z;
        third += z2 * z;
        fourth += z2 * z2;
    }
    (third / n, fourth / n)
}

/// Normality test over finite values: `(is_normal, p_value)`
pub(crate) fn test_normality(data: &[f64]) -> (bool, f64) {
    if data.len() < 3 {
        return NOT_NORMAL;
    }

    let m = mean(data);
    let std_dev = population_std(data);
    if std_dev == 0.0 || !std_dev.is_finite() {
        return NOT_NORMAL;
    }

    if data.len() >= DAGOSTINO_MIN_N {
        return dagostino_k2(data, m, std_dev);
    }

    let skew = skewness(data, m, std_dev);
    let (_, b2) = moment_ratios(data, m, std_dev);
    let excess = b2 - 3.0;
    let statistic = skew.abs() + excess.abs() / 2.0;
    let p_value = chi_square_p_value(statistic * statistic, 2.0);
    (p_value > NORMALITY_ALPHA, p_value)
}

fn dagostino_k2(data: &[f64], m: f64, std_dev: f64) -> (bool, f64) {
    let n = data.len() as f64;
    let (sqrt_b1, b2) = moment_ratios(data, m, std_dev);

    // Skewness transform
    let y = sqrt_b1 * ((n + 1.0) * (n + 3.0) / (6.0 * (n - 2.0))).sqrt();
    let beta2 = 3.0 * (n * n + 27.0 * n - 70.0) * (n + 1.0) * (n + 3.0)
        / ((n - 2.0) * (n + 5.0) * (n + 7.0) * (n + 9.0));
    let w2 = -1.0 + (2.0 * (beta2 - 1.0)).sqrt();
    if !(w2 > 1.0) {
        return NOT_NORMAL;
    }
    let delta = 1.0 / w2.sqrt().ln().sqrt();
    let alpha = (2.0 / (w2 - 1.0)).sqrt();
    let ay = y / alpha;
    let z1 = delta * (ay + (ay * ay + 1.0).sqrt()).ln();

    // Kurtosis transform
    let expected = 3.0 * (n - 1.0) / (n + 1.0);
    let variance = 24.0 * n * (n - 2.0) * (n - 3.0)
        / ((n + 1.0) * (n + 1.0) * (n + 3.0) * (n + 5.0));
    if !(variance > 0.0) {
        return NOT_NORMAL;
    }
    let x = (b2 - expected) / variance.sqrt();

    let sqrt_beta1 = 6.0 * (n * n - 5.0 * n + 2.0) / ((n + 7.0) * (n + 9.0))
        * (6.0 * (n + 3.0) * (n + 5.0) / (n * (n - 2.0) * (n - 3.0))).sqrt();
    let a = 6.0
        + 8.0 / sqrt_beta1 * (2.0 / sqrt_beta1 + (1.0 + 4.0 / (sqrt_beta1 * sqrt_beta1)).sqrt());
    if !(a > 4.0) {
        return NOT_NORMAL;
    }
    let denominator = 1.0 + x * (2.0 / (a - 4.0)).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return NOT_NORMAL;
    }
    // cbrt keeps the sign of a negative denominator
    let term = 1.0 - 2.0 / (9.0 * a);
    let z2 = (term - ((1.0 - 2.0 / a) / denominator).cbrt()) / (2.0 / (9.0 * a)).sqrt();

    let k2 = z1 * z1 + z2 * z2;
    if !k2.is_finite() {
        return NOT_NORMAL;
    }
    let p_value = chi_square_p_value(k2, 2.0);
    (p_value > NORMALITY_ALPHA, p_value)
}

/// Shape section of a brief
pub fn compute_distribution(finite: &[f64]) -> DistributionStats {
    let m = mean(finite);
    let std_dev = population_std(finite);
    let (is_normal, shapiro_p) = test_normality(finite);

    DistributionStats {
        skewness: skewness(finite, m, std_dev),
        kurtosis: kurtosis(finite, m, std_dev),
        is_normal,
        shapiro_p,
    }
}

//! Temporal structure of a series
//!
//! - Variance stationarity: two-sided F-test between the two halves
//! - Augmented Dickey-Fuller (no augmentation lags, constant term) with
//!   MacKinnon (1994) approximate p-values
//! - Autocorrelation and Bartlett-bounded lag suggestions
//! - Stability of rolling-window variances

use super::summary::{mean, population_std, population_variance};
use crate::distributions::{f_cdf, normal_cdf};
use crate::relationship::pearson_r;
use crate::types::TemporalStats;

/// Shortest series for the stationarity tests and the stability score
const MIN_TEMPORAL_N: usize = 10;

const STATIONARITY_ALPHA: f64 = 0.05;

/// Largest lag scanned for lag suggestions
const MAX_SUGGESTED_LAG: usize = 10;
const MAX_SUGGESTIONS: usize = 3;

/// 97.5% standard normal quantile
const Z_975: f64 = 1.96;

const MAX_STABILITY_WINDOW: usize = 30;
const MIN_STABILITY_WINDOW: usize = 5;

// MacKinnon (1994) response surface, constant-only regression, one series
const ADF_TAU_MAX: f64 = 2.74;
const ADF_TAU_MIN: f64 = -18.83;
const ADF_TAU_STAR: f64 = -1.61;
const ADF_SMALL_P: [f64; 3] = [2.1659, 1.4412, 0.038269];
const ADF_LARGE_P: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

/// Two-sided F-test of equal variance between the first and second half
///
/// Returns `(is_stationary, p_value)`; `(false, 1.0)` for fewer than 10 values
/// or a zero-variance half.
pub(crate) fn variance_stationarity(data: &[f64]) -> (bool, f64) {
    if data.len() < MIN_TEMPORAL_N {
        return (false, 1.0);
    }

    let (first, second) = data.split_at(data.len() / 2);
    let df1 = (first.len() - 1) as f64;
    let df2 = (second.len() - 1) as f64;

    let numerator = population_variance(first);
    let denominator = population_variance(second);
    if denominator <= 0.0 {
        return (false, 1.0);
    }
    let f = numerator / denominator;
    if !(f > 0.0) {
        return (false, 1.0);
    }

    let cdf = f_cdf(f, df1, df2);
    let p_value = (2.0 * cdf.min(1.0 - cdf)).clamp(0.0, 1.0);
    (p_value > STATIONARITY_ALPHA, p_value)
}

/// Autocorrelation at `lag` around the full-series mean; 0.0 when undefined
pub(crate) fn autocorrelation(data: &[f64], lag: usize) -> f64 {
    if data.len() <= lag {
        return 0.0;
    }

    let m = mean(data);
    let (mut numerator, mut leading, mut trailing) = (0.0, 0.0, 0.0);
    for i in 0..data.len() - lag {
        let a = data[i] - m;
        let b = data[i + lag] - m;
        numerator += a * b;
        leading += a * a;
        trailing += b * b;
    }

    if leading == 0.0 || trailing == 0.0 {
        return 0.0;
    }
    numerator / (leading * trailing).sqrt()
}

/// Pearson correlation of each value with its successor; 0.0 when undefined
pub(crate) fn lag_one_correlation(data: &[f64]) -> f64 {
    if data.len() < 3 {
        return 0.0;
    }
    pearson_r(&data[..data.len() - 1], &data[1..]).unwrap_or(0.0)
}

/// Up to three lags whose autocorrelation exceeds the 95% Bartlett bound
///
/// The strongest lags by |r| are kept and returned in ascending lag order.
pub(crate) fn suggested_lags(data: &[f64]) -> Vec<usize> {
    let max_lag = MAX_SUGGESTED_LAG.min(data.len() / 3);
    if max_lag < 1 {
        return Vec::new();
    }

    let n = data.len() as f64;
    let mut sum_sq_previous = 0.0;
    let mut candidates: Vec<(usize, f64)> = Vec::new();

    for lag in 1..=max_lag {
        let r = autocorrelation(data, lag);
        let bound = Z_975 * ((1.0 + 2.0 * sum_sq_previous) / n).sqrt();
        if r.abs() > bound {
            candidates.push((lag, r.abs()));
        }
        sum_sq_previous += r * r;
    }

    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
    candidates.truncate(MAX_SUGGESTIONS);

    let mut lags: Vec<usize> = candidates.into_iter().map(|(lag, _)| lag).collect();
    lags.sort_unstable();
    lags
}

/// `1 / (1 + CV)` of rolling-window variances, in (0, 1]
///
/// 0.0 for fewer than 10 values; 1.0 when every window is constant.
pub(crate) fn stability_score(data: &[f64]) -> f64 {
    if data.len() < MIN_TEMPORAL_N {
        return 0.0;
    }

    let mut window = MAX_STABILITY_WINDOW.min(data.len() / 3);
    if window < MIN_STABILITY_WINDOW {
        window = data.len();
    }

    let variances: Vec<f64> = data.windows(window).map(population_variance).collect();
    let mean_variance = mean(&variances);
    if mean_variance == 0.0 {
        return 1.0;
    }

    let cv = population_std(&variances) / mean_variance;
    (1.0 / (1.0 + cv)).min(1.0)
}

/// Dickey-Fuller regression `dx_t = a + b * x_{t-1}`: `(t-ratio of b, p-value)`
///
/// `(0.0, 1.0)` for fewer than 10 values or a degenerate regression.
pub(crate) fn adf_test(data: &[f64]) -> (f64, f64) {
    if data.len() < MIN_TEMPORAL_N {
        return (0.0, 1.0);
    }

    let lagged = &data[..data.len() - 1];
    let diffs: Vec<f64> = data.windows(2).map(|w| w[1] - w[0]).collect();
    let m = diffs.len() as f64;

    let mean_x = mean(lagged);
    let mean_y = mean(&diffs);
    let (mut sxx, mut sxy) = (0.0, 0.0);
    for (x, y) in lagged.iter().zip(&diffs) {
        sxx += (x - mean_x) * (x - mean_x);
        sxy += (x - mean_x) * (y - mean_y);
    }
    if sxx <= 0.0 {
        return (0.0, 1.0);
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let ssr: f64 = lagged
        .iter()
        .zip(&diffs)
        .map(|(x, y)| (y - intercept - slope * x).powi(2))
        .sum();

    let residual_variance = ssr / (m - 2.0);
    let standard_error = (residual_variance / sxx).sqrt();
    if !(standard_error > 0.0) || !standard_error.is_finite() {
        return (0.0, 1.0);
    }

    let statistic = slope / standard_error;
    (statistic, mackinnon_p_value(statistic))
}

/// Approximate asymptotic p-value of a Dickey-Fuller tau statistic
pub(crate) fn mackinnon_p_value(statistic: f64) -> f64 {
    if statistic.is_nan() {
        return 1.0;
    }
    if statistic > ADF_TAU_MAX {
        return 1.0;
    }
    if statistic < ADF_TAU_MIN {
        return 0.0;
    }

    let coefficients: &[f64] = if statistic <= ADF_TAU_STAR {
        &ADF_SMALL_P
    } else {
        &ADF_LARGE_P
    };
    let polynomial: f64 = coefficients
        .iter()
        .enumerate()
        .map(|(power, c)| c * statistic.powi(power as i32))
        .sum();
    normal_cdf(polynomial)
}

/// Temporal section over finite values
pub fn compute_temporal(finite: &[f64]) -> TemporalStats {
    let (is_stationary, variance_p_value) = variance_stationarity(finite);
    let (adf_statistic, adf_p_value) = adf_test(finite);

    TemporalStats {
        is_stationary,
        variance_p_value,
        adf_statistic,
        adf_p_value,
        suggested_lags: suggested_lags(finite),
        autocorr_lag1: lag_one_correlation(finite),
        stability_score: stability_score(finite),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_series_defaults() {
        let stats = compute_temporal(&[1.0, 2.0, 3.0]);
        assert!(!stats.is_stationary);
        assert_eq!(stats.variance_p_value, 1.0);
        assert_eq!(stats.adf_statistic, 0.0);
        assert_eq!(stats.adf_p_value, 1.0);
        assert_eq!(stats.stability_score, 0.0);
        assert!(stats.suggested_lags.is_empty());
    }

    #[test]
    fn test_variance_shift_is_not_stationary() {
        let mut data: Vec<f64> = (0..50).map(|i| if i % 2 == 0 { 0.1 } else { -0.1 }).collect();
        data.extend((0..50).map(|i| if i % 2 == 0 { 10.0 } else { -10.0 }));
        let (stationary, p) = variance_stationarity(&data);
        assert!(!stationary);
        assert!(p < 1e-6, "p = {}", p);
    }

    #[test]
    fn test_equal_halves_are_stationary() {
        let data: Vec<f64> = (0..100).map(|i| ((i * 7) % 11) as f64).collect();
        let (stationary, p) = variance_stationarity(&data);
        assert!(stationary, "p = {}", p);
    }

    #[test]
    fn test_autocorrelation_of_alternating_series() {
        let data: Vec<f64> = (0..40).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        assert!((autocorrelation(&data, 1) + 1.0).abs() < 1e-12);
        assert!((autocorrelation(&data, 2) - 1.0).abs() < 1e-12);
        assert_eq!(autocorrelation(&[5.0; 10], 1), 0.0);
        assert_eq!(autocorrelation(&[1.0, 2.0], 2), 0.0);
    }

    #[test]
    fn test_lag_one_correlation_uses_shifted_pairs() {
        // A straight line is perfectly correlated with its own successor
        let line: Vec<f64> = (0..20).map(|i| i as f64).collect();
        assert!((lag_one_correlation(&line) - 1.0).abs() < 1e-12);
        assert!(autocorrelation(&line, 1) < 1.0);
        assert_eq!(lag_one_correlation(&[4.0; 8]), 0.0);
        assert_eq!(lag_one_correlation(&[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_suggested_lags_period_four() {
        let data: Vec<f64> = (0..120).map(|i| [0.0, 1.0, 0.0, -1.0][i % 4]).collect();
        let lags = suggested_lags(&data);
        assert!(lags.len() <= 3);
        assert!(lags.windows(2).all(|w| w[0] < w[1]));
        assert!(lags.contains(&2) || lags.contains(&4), "lags = {:?}", lags);
    }

    #[test]
    fn test_stability_score_bounds() {
        assert_eq!(stability_score(&[2.0; 40]), 1.0);
        let data: Vec<f64> = (0..90).map(|i| (i as f64).sin() * (1.0 + i as f64 / 10.0)).collect();
        let score = stability_score(&data);
        assert!(score > 0.0 && score < 1.0, "score = {}", score);
    }

    #[test]
    fn test_adf_rejects_unit_root_for_mean_reverting_series() {
        let data: Vec<f64> = (0..60)
            .map(|t| if t % 2 == 0 { 1.0 } else { -1.0 } + 0.1 * (t as f64).sin())
            .collect();
        let (statistic, p) = adf_test(&data);
        assert!(statistic < ADF_TAU_STAR);
        assert!(p < 0.01, "stat = {} p = {}", statistic, p);
    }

    #[test]
    fn test_adf_keeps_unit_root_for_trend() {
        let data: Vec<f64> = (0..50).map(|t| t as f64 + 0.5 * (t as f64).sin()).collect();
        let (statistic, p) = adf_test(&data);
        assert!(p > 0.10, "stat = {} p = {}", statistic, p);
    }

    #[test]
    fn test_mackinnon_bounds() {
        assert_eq!(mackinnon_p_value(5.0), 1.0);
        assert_eq!(mackinnon_p_value(-25.0), 0.0);
        // Critical value at 5% for the constant case is about -2.86
        let p = mackinnon_p_value(-2.86);
        assert!((p - 0.05).abs() < 0.01, "p = {}", p);
        let mut previous = 0.0;
        for step in 0..40 {
            let p = mackinnon_p_value(-18.0 + step as f64 * 0.5);
            assert!(p >= previous);
            previous = p;
        }
    }
}

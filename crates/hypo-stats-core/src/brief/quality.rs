//! Data quality metrics

use crate::types::{QualityStats, SummaryStats};

/// Multiplier applied to the interquartile range for outlier fences
const IQR_FENCE: f64 = 1.5;

/// Fraction of NaN or infinite values
pub(crate) fn missing_ratio(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let missing = data.iter().filter(|x| !x.is_finite()).count();
    missing as f64 / data.len() as f64
}

/// Fraction of exact zeros
pub(crate) fn sparsity_ratio(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let zeros = data.iter().filter(|&&x| x == 0.0).count();
    zeros as f64 / data.len() as f64
}

/// Half the coefficient of variation, capped at 1; a zero mean is maximal noise
pub(crate) fn noise_coefficient(std_dev: f64, mean: f64) -> f64 {
    if mean == 0.0 {
        return 1.0;
    }
    let cv = std_dev / mean.abs();
    if cv.is_nan() {
        return 1.0;
    }
    (cv / 2.0).clamp(0.0, 1.0)
}

/// Values outside the 1.5 x IQR fences
pub(crate) fn count_outliers(finite: &[f64], q25: f64, q75: f64) -> usize {
    let iqr = q75 - q25;
    let lower = q25 - IQR_FENCE * iqr;
    let upper = q75 + IQR_FENCE * iqr;
    finite.iter().filter(|&&x| x < lower || x > upper).count()
}

/// Quality section: ratios over the raw input, noise and outliers over finite values
pub fn compute_quality(data: &[f64], finite: &[f64], summary: &SummaryStats) -> QualityStats {
    QualityStats {
        missing_ratio: missing_ratio(data),
        sparsity_ratio: sparsity_ratio(data),
        noise_coefficient: noise_coefficient(summary.std_dev, summary.mean),
        outlier_count: count_outliers(finite, summary.q25, summary.q75),
    }
}

//! Descriptive statistics
//!
//! Spread is reported as the population standard deviation (divide by n).

use crate::types::SummaryStats;

pub(crate) fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Variance dividing by n
pub(crate) fn population_variance(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let m = mean(data);
    data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / data.len() as f64
}

/// Variance dividing by n - 1
pub(crate) fn sample_variance(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let m = mean(data);
    data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (data.len() - 1) as f64
}

pub(crate) fn population_std(data: &[f64]) -> f64 {
    population_variance(data).sqrt()
}

/// Percentile of an ascending slice, linear interpolation between nearest ranks
pub(crate) fn percentile_sorted(sorted: &[f64], percentile: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = (percentile / 100.0).clamp(0.0, 1.0) * (n - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = (lower + 1).min(n - 1);
            let fraction = rank - lower as f64;
            sorted[lower] + fraction * (sorted[upper] - sorted[lower])
        }
    }
}

pub(crate) fn sorted_copy(data: &[f64]) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

pub(crate) fn median_of(data: &[f64]) -> f64 {
    percentile_sorted(&sorted_copy(data), 50.0)
}

/// Summary statistics over finite values
pub fn compute_summary(finite: &[f64]) -> SummaryStats {
    if finite.is_empty() {
        return SummaryStats::default();
    }

    let sorted = sorted_copy(finite);
    SummaryStats {
        mean: mean(finite),
        std_dev: population_std(finite),
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        median: percentile_sorted(&sorted, 50.0),
        q25: percentile_sorted(&sorted, 25.0),
        q75: percentile_sorted(&sorted, 75.0),
    }
}

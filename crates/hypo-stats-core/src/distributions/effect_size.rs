//! Effect sizes and mean confidence intervals

use statrs::distribution::{ContinuousCDF, StudentsT};

/// Cohen's d on the pooled standard deviation of two groups
///
/// Returns 0.0 for empty groups or a zero pooled deviation.
pub fn cohen_d(mean1: f64, mean2: f64, std1: f64, std2: f64, n1: usize, n2: usize) -> f64 {
    if n1 == 0 || n2 == 0 || n1 + n2 <= 2 {
        return 0.0;
    }

    let (n1, n2) = (n1 as f64, n2 as f64);
    let pooled_var = ((n1 - 1.0) * std1 * std1 + (n2 - 1.0) * std2 * std2) / (n1 + n2 - 2.0);
    let pooled_std = pooled_var.sqrt();
    if pooled_std == 0.0 || !pooled_std.is_finite() {
        return 0.0;
    }

    let d = (mean1 - mean2) / pooled_std;
    if d.is_finite() {
        d
    } else {
        0.0
    }
}

/// Hedges' g: Cohen's d with the small-sample bias correction 1 - 3 / (4N - 9)
pub fn hedges_g(cohen_d: f64, total_n: usize) -> f64 {
    if total_n < 3 {
        return cohen_d;
    }
    let correction = 1.0 - 3.0 / (4.0 * total_n as f64 - 9.0);
    cohen_d * correction
}

/// t-based confidence interval for a population mean
///
/// Collapses to `(mean, mean)` when fewer than two observations are available.
pub fn confidence_interval_mean(
    sample_mean: f64,
    sample_std: f64,
    sample_size: usize,
    confidence_level: f64,
) -> (f64, f64) {
    if sample_size < 2 || !sample_std.is_finite() {
        return (sample_mean, sample_mean);
    }

    let level = if confidence_level > 0.0 && confidence_level < 1.0 {
        confidence_level
    } else {
        0.95
    };
    let df = (sample_size - 1) as f64;
    let t_critical = match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => dist.inverse_cdf(1.0 - (1.0 - level) / 2.0),
        Err(_) => return (sample_mean, sample_mean),
    };

    let margin = t_critical * sample_std.abs() / (sample_size as f64).sqrt();
    (sample_mean - margin, sample_mean + margin)
}

//! CDF-based p-values
//!
//! - Student's t (two-tailed)
//! - Correlation coefficient via the t transform
//! - F and chi-square upper tails
//! - Standard normal CDF / quantile, regularized beta CDF
//!
//! Degenerate input never produces NaN: invalid degrees of freedom give
//! p = 1.0, infinite statistics give p = 0.0.

use statrs::distribution::{Beta, ChiSquared, ContinuousCDF, FisherSnedecor, Normal, StudentsT};

/// Force a probability into [0, 1], mapping NaN to the conservative 1.0
pub(crate) fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() {
        1.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

fn valid_dof(df: f64) -> bool {
    df.is_finite() && df > 0.0
}

/// Two-tailed p-value for a Student's t statistic
///
/// Returns 1.0 when `degrees_of_freedom <= 0`.
pub fn t_test_p_value(t_statistic: f64, degrees_of_freedom: f64) -> f64 {
    if !valid_dof(degrees_of_freedom) || t_statistic.is_nan() {
        return 1.0;
    }
    if t_statistic.is_infinite() {
        return 0.0;
    }

    match StudentsT::new(0.0, 1.0, degrees_of_freedom) {
        Ok(dist) => clamp_probability(2.0 * dist.sf(t_statistic.abs())),
        Err(_) => 1.0,
    }
}

/// Two-tailed p-value for a Pearson-type correlation coefficient
///
/// Uses t = r * sqrt(df / (1 - r^2)) with df = n - 2. Returns 1.0 when n < 3
/// and 0.0 for a perfect correlation.
pub fn correlation_p_value(correlation: f64, sample_size: usize) -> f64 {
    if sample_size < 3 || correlation.is_nan() {
        return 1.0;
    }

    let r = correlation.clamp(-1.0, 1.0);
    let radicand = 1.0 - r * r;
    if radicand <= 0.0 {
        return 0.0;
    }

    let df = (sample_size - 2) as f64;
    let t_statistic = r * (df / radicand).sqrt();
    t_test_p_value(t_statistic, df)
}

/// Upper-tail p-value of the F distribution
pub fn f_test_p_value(f_statistic: f64, df1: f64, df2: f64) -> f64 {
    if !valid_dof(df1) || !valid_dof(df2) || f_statistic.is_nan() || f_statistic <= 0.0 {
        return 1.0;
    }
    if f_statistic.is_infinite() {
        return 0.0;
    }

    match FisherSnedecor::new(df1, df2) {
        Ok(dist) => clamp_probability(dist.sf(f_statistic)),
        Err(_) => 1.0,
    }
}

/// CDF of the F distribution; 0.0 for non-positive or invalid input
pub fn f_cdf(f_statistic: f64, df1: f64, df2: f64) -> f64 {
    if !valid_dof(df1) || !valid_dof(df2) || f_statistic.is_nan() || f_statistic <= 0.0 {
        return 0.0;
    }
    if f_statistic.is_infinite() {
        return 1.0;
    }

    match FisherSnedecor::new(df1, df2) {
        Ok(dist) => dist.cdf(f_statistic).clamp(0.0, 1.0),
        Err(_) => 0.0,
    }
}

/// Upper-tail p-value of the chi-square distribution
pub fn chi_square_p_value(chi_square: f64, degrees_of_freedom: f64) -> f64 {
    if !valid_dof(degrees_of_freedom) || chi_square.is_nan() || chi_square <= 0.0 {
        return 1.0;
    }
    if chi_square.is_infinite() {
        return 0.0;
    }

    match ChiSquared::new(degrees_of_freedom) {
        Ok(dist) => clamp_probability(dist.sf(chi_square)),
        Err(_) => 1.0,
    }
}

fn standard_normal() -> Option<Normal> {
    Normal::new(0.0, 1.0).ok()
}

/// Standard normal CDF
pub fn normal_cdf(x: f64) -> f64 {
    if x.is_nan() {
        return 0.5;
    }
    match standard_normal() {
        Some(dist) => dist.cdf(x).clamp(0.0, 1.0),
        None => 0.5,
    }
}

/// Standard normal quantile (inverse CDF)
///
/// `p` is clamped away from 0 and 1 so the result is always finite.
pub fn normal_quantile(p: f64) -> f64 {
    if p.is_nan() {
        return 0.0;
    }
    let p = p.clamp(f64::EPSILON, 1.0 - f64::EPSILON);
    match standard_normal() {
        Some(dist) => dist.inverse_cdf(p),
        None => 0.0,
    }
}

/// Two-sided critical value of the standard normal at `confidence_level`
pub(crate) fn normal_critical(confidence_level: f64) -> f64 {
    let level = if confidence_level > 0.0 && confidence_level < 1.0 {
        confidence_level
    } else {
        0.95
    };
    normal_quantile(1.0 - (1.0 - level) / 2.0)
}

/// CDF of the Beta(alpha, beta) distribution
///
/// Invalid shape parameters yield 0.0; `x` outside (0, 1) saturates.
pub fn beta_cdf(x: f64, alpha: f64, beta: f64) -> f64 {
    if !valid_dof(alpha) || !valid_dof(beta) || x.is_nan() {
        return 0.0;
    }
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    match Beta::new(alpha, beta) {
        Ok(dist) => dist.cdf(x).clamp(0.0, 1.0),
        Err(_) => 0.0,
    }
}

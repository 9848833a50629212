//! Pearson correlation with Fisher-z confidence intervals

use crate::distributions::{correlation_p_value, normal_critical};

/// Pearson r from raw sums, clamped to [-1, 1]
///
/// `None` for fewer than two pairs, unequal lengths or a zero-variance side.
pub fn pearson_r(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let n = x.len() as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2, mut sum_y2) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        sum_x += a;
        sum_y += b;
        sum_xy += a * b;
        sum_x2 += a * a;
        sum_y2 += b * b;
    }

    let numerator = n * sum_xy - sum_x * sum_y;
    let denom_x = n * sum_x2 - sum_x * sum_x;
    let denom_y = n * sum_y2 - sum_y * sum_y;
    if !(denom_x > 0.0) || !(denom_y > 0.0) {
        return None;
    }

    let r = numerator / (denom_x * denom_y).sqrt();
    if r.is_finite() {
        Some(r.clamp(-1.0, 1.0))
    } else {
        None
    }
}

/// `(r, p)`; `(0.0, 1.0)` when r is undefined
pub fn pearson(x: &[f64], y: &[f64]) -> (f64, f64) {
    match pearson_r(x, y) {
        Some(r) => (r, correlation_p_value(r, x.len())),
        None => (0.0, 1.0),
    }
}

/// Fisher-z confidence interval for r, `[lower, upper]` within [-1, 1]
///
/// Collapses to `[r, r]` below three pairs and spans `[-1, 1]` at exactly three.
pub fn correlation_confidence_interval(r: f64, n: usize, confidence_level: f64) -> [f64; 2] {
    let r = if r.is_nan() { 0.0 } else { r.clamp(-1.0, 1.0) };
    if n < 3 {
        return [r, r];
    }
    if n == 3 {
        return [-1.0, 1.0];
    }

    let z = r.atanh();
    let margin = normal_critical(confidence_level) / ((n - 3) as f64).sqrt();
    let lower = (z - margin).tanh().clamp(-1.0, 1.0);
    let upper = (z + margin).tanh().clamp(-1.0, 1.0);

    if lower <= upper {
        [lower, upper]
    } else {
        [upper, lower]
    }
}

/// `"<strength> <direction> correlation (r=.., p=..)"` or a non-significance note
pub fn interpret_correlation(r: f64, p_value: f64, alpha: f64) -> String {
    if p_value > alpha {
        return format!(
            "No statistically significant correlation (r={:.3}, p={:.3})",
            r, p_value
        );
    }

    let magnitude = r.abs();
    let strength = if magnitude >= 0.8 {
        "very strong"
    } else if magnitude >= 0.6 {
        "strong"
    } else if magnitude >= 0.3 {
        "moderate"
    } else {
        "weak"
    };
    let direction = if r < 0.0 { "negative" } else { "positive" };

    format!("{} {} correlation (r={:.3}, p={:.3})", strength, direction, r, p_value)
}

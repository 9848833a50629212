//! Two-sample mean difference

use crate::brief::{mean, sample_variance};
use crate::distributions::{cohen_d, t_test_p_value};

/// Outcome of a pooled-variance two-sample t-test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TTestOutcome {
    pub t_statistic: f64,
    pub degrees_of_freedom: f64,
    pub p_value: f64,
    pub cohen_d: f64,
}

impl TTestOutcome {
    fn degenerate(degrees_of_freedom: f64) -> Self {
        Self {
            t_statistic: 0.0,
            degrees_of_freedom,
            p_value: 1.0,
            cohen_d: 0.0,
        }
    }
}

/// Student's t-test assuming equal variances, treating `x` and `y` as two groups
///
/// Either group below two values or a zero pooled variance gives t = 0, p = 1.
pub fn pooled_t_test(x: &[f64], y: &[f64]) -> TTestOutcome {
    if x.len() < 2 || y.len() < 2 {
        return TTestOutcome::degenerate(0.0);
    }

    let (n1, n2) = (x.len() as f64, y.len() as f64);
    let df = n1 + n2 - 2.0;
    let (mean_x, mean_y) = (mean(x), mean(y));
    let (var_x, var_y) = (sample_variance(x), sample_variance(y));

    let pooled_variance = ((n1 - 1.0) * var_x + (n2 - 1.0) * var_y) / df;
    if !(pooled_variance > 0.0) {
        return TTestOutcome::degenerate(df);
    }

    let t_statistic = (mean_x - mean_y) / (pooled_variance * (1.0 / n1 + 1.0 / n2)).sqrt();
    TTestOutcome {
        t_statistic,
        degrees_of_freedom: df,
        p_value: t_test_p_value(t_statistic, df),
        cohen_d: cohen_d(mean_x, mean_y, var_x.sqrt(), var_y.sqrt(), x.len(), y.len()),
    }
}

/// Effect-size label for Cohen's d, gated on significance
pub fn interpret_difference(d: f64, p_value: f64, alpha: f64) -> String {
    if p_value > alpha {
        return format!(
            "No statistically significant difference (d={:.3}, p={:.3})",
            d, p_value
        );
    }

    let magnitude = d.abs();
    let strength = if magnitude >= 0.8 {
        "large"
    } else if magnitude >= 0.5 {
        "medium"
    } else {
        "small"
    };
    format!(
        "{} effect size difference (Cohen's d={:.3}, p={:.3})",
        strength, d, p_value
    )
}

//! Lagged cross-correlation
//!
//! A positive lag pairs `x[i]` with `y[i - lag]`; a negative lag pairs
//! `x[i - |lag|]` with `y[i]`. The lag with the largest |r| wins. Series keep
//! their original time index: a pair with a non-finite side is skipped within
//! each lag rather than removed up front.

use super::{classify_signal, StatisticalSense};
use crate::types::{SenseResult, Signal, VariableKey};

pub(crate) const NAME: &str = "cross_correlation";

const MIN_SAMPLES: usize = 10;
/// Smallest |r| reported as a signal
const MIN_CORRELATION: f64 = 0.1;
const MAX_PSEUDO_CONFIDENCE: f64 = 0.99;
const BANDS: [f64; 3] = [0.7, 0.5, 0.3];

/// Correlation over the finite pairs of the overlapping window at `lag`; 0.0 when undefined
pub(crate) fn lagged_correlation(x: &[f64], y: &[f64], lag: isize) -> f64 {
    let n = x.len().min(y.len());
    let shift = lag.unsigned_abs();
    if shift >= n {
        return 0.0;
    }

    let (leading, trailing) = if lag >= 0 {
        (&x[shift..n], &y[..n - shift])
    } else {
        (&x[..n - shift], &y[shift..n])
    };

    let mut count = 0.0;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2, mut sum_y2) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for (a, b) in leading.iter().zip(trailing) {
        if !a.is_finite() || !b.is_finite() {
            continue;
        }
        count += 1.0;
        sum_x += a;
        sum_y += b;
        sum_xy += a * b;
        sum_x2 += a * a;
        sum_y2 += b * b;
    }
    if count <= 1.0 {
        return 0.0;
    }

    let mean_x = sum_x / count;
    let mean_y = sum_y / count;
    let numerator = sum_xy - count * mean_x * mean_y;
    let denom_x = sum_x2 - count * mean_x * mean_x;
    let denom_y = sum_y2 - count * mean_y * mean_y;
    if !(denom_x > 0.0) || !(denom_y > 0.0) {
        return 0.0;
    }

    (numerator / (denom_x * denom_y).sqrt()).clamp(-1.0, 1.0)
}

/// `(r, lag)` with the largest |r| over `-max_lag..=max_lag`; earliest lag wins ties
pub(crate) fn best_lag(x: &[f64], y: &[f64], max_lag: usize) -> (f64, isize) {
    let max_lag = max_lag as isize;
    let mut best: (f64, isize) = (0.0, 0);
    for lag in -max_lag..=max_lag {
        let r = lagged_correlation(x, y, lag);
        if r.abs() > best.0.abs() {
            best = (r, lag);
        }
    }
    best
}

#[derive(Debug, Clone)]
pub struct CrossCorrelationSense {
    max_lag: usize,
    alpha: f64,
}

impl CrossCorrelationSense {
    pub fn new(max_lag: usize, alpha: f64) -> Self {
        Self { max_lag, alpha }
    }
}

impl StatisticalSense for CrossCorrelationSense {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> String {
        "Detects lagged relationships between time series".to_string()
    }

    fn analyze(&self, x: &[f64], y: &[f64], _var_x: &VariableKey, _var_y: &VariableKey) -> SenseResult {
        let finite = x
            .iter()
            .zip(y)
            .filter(|(a, b)| a.is_finite() && b.is_finite())
            .count();
        if x.len() != y.len() || finite < MIN_SAMPLES {
            return SenseResult::insufficient(NAME, "Insufficient data for cross-correlation analysis");
        }

        let (r, lag) = best_lag(x, y, self.max_lag);
        if r.abs() < MIN_CORRELATION {
            return SenseResult::new(
                NAME,
                r,
                1.0,
                Signal::Weak,
                "No significant cross-correlation at any lag",
            )
            .with_metadata("best_lag", lag)
            .with_metadata("max_lag_searched", self.max_lag);
        }

        // Heuristic: stronger correlation, smaller p
        let p_value = 1.0 - r.abs().min(MAX_PSEUDO_CONFIDENCE);
        let signal = classify_signal(r.abs(), p_value, self.alpha, BANDS);

        let description = if p_value > self.alpha {
            format!(
                "No significant cross-correlation (r={:.3} at lag {}, p={:.3})",
                r, lag, p_value
            )
        } else {
            let direction = if lag < 0 { "lags behind" } else { "leads" };
            format!(
                "Cross-correlation shows {} relationship (r={:.3} at lag {}, p={:.3})",
                direction, r, lag, p_value
            )
        };

        SenseResult::new(NAME, r, p_value, signal, description)
            .with_metadata("best_lag", lag)
            .with_metadata("max_lag_searched", self.max_lag)
    }
}

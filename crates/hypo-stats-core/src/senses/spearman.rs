//! Spearman rank correlation

use super::{classify_signal, finite_pairs, StatisticalSense};
use crate::config::TieMethod;
use crate::distributions::t_test_p_value;
use crate::relationship::pearson_r;
use crate::types::{SenseResult, VariableKey};

pub(crate) const NAME: &str = "spearman";

const MIN_SAMPLES: usize = 3;
const BANDS: [f64; 3] = [0.8, 0.6, 0.3];

/// 1-based ranks
///
/// `Ordinal` gives tied values consecutive ranks in scan order; `Average`
/// gives each member of a tie group the mean of the ranks it spans.
pub(crate) fn rank(data: &[f64], ties: TieMethod) -> Vec<f64> {
    let mut order: Vec<usize> = (0..data.len()).collect();
    order.sort_by(|&a, &b| data[a].total_cmp(&data[b]));

    let mut ranks = vec![0.0; data.len()];
    match ties {
        TieMethod::Ordinal => {
            for (position, &index) in order.iter().enumerate() {
                ranks[index] = (position + 1) as f64;
            }
        }
        TieMethod::Average => {
            let mut start = 0;
            while start < order.len() {
                let mut end = start + 1;
                while end < order.len() && data[order[end]] == data[order[start]] {
                    end += 1;
                }
                // Positions start..end hold ranks start+1..=end
                let shared = (start + 1 + end) as f64 / 2.0;
                for &index in &order[start..end] {
                    ranks[index] = shared;
                }
                start = end;
            }
        }
    }
    ranks
}

#[derive(Debug, Clone)]
pub struct SpearmanSense {
    ties: TieMethod,
    alpha: f64,
}

impl SpearmanSense {
    pub fn new(ties: TieMethod, alpha: f64) -> Self {
        Self { ties, alpha }
    }
}

impl StatisticalSense for SpearmanSense {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> String {
        "Detects monotonic relationships robust to outliers and non-normality".to_string()
    }

    fn analyze(&self, x: &[f64], y: &[f64], _var_x: &VariableKey, _var_y: &VariableKey) -> SenseResult {
        let (x, y) = match finite_pairs(x, y) {
            Some(pairs) if pairs.0.len() >= MIN_SAMPLES => pairs,
            _ => {
                return SenseResult::insufficient(
                    NAME,
                    "Insufficient data for Spearman correlation analysis",
                )
            }
        };

        let rho = match pearson_r(&rank(&x, self.ties), &rank(&y, self.ties)) {
            Some(rho) => rho,
            None => return SenseResult::insufficient(NAME, "Unable to compute Spearman correlation"),
        };

        let df = (x.len() - 2) as f64;
        let radicand = 1.0 - rho * rho;
        let t_statistic = if radicand > 0.0 {
            rho * (df / radicand).sqrt()
        } else {
            rho.signum() * f64::INFINITY
        };
        let p_value = t_test_p_value(t_statistic, df);
        let signal = classify_signal(rho.abs(), p_value, self.alpha, BANDS);

        let description = if p_value > self.alpha {
            format!(
                "No significant monotonic relationship (ρ={:.3}, p={:.3})",
                rho, p_value
            )
        } else {
            let direction = if rho < 0.0 { "negative" } else { "positive" };
            format!(
                "{} monotonic relationship detected (ρ={:.3}, p={:.3})",
                direction, rho, p_value
            )
        };

        let mut result = SenseResult::new(NAME, rho, p_value, signal, description)
            .with_metadata("degrees_of_freedom", df)
            .with_metadata("tie_method", self.ties.as_str());
        if t_statistic.is_finite() {
            result = result.with_metadata("t_statistic", t_statistic);
        }
        result
    }
}

//! Welch's t-test on groups derived from the pair
//!
//! A binary x splits y into two groups; failing that a binary y splits x;
//! otherwise x is split at its median and y is compared across the halves.

use super::{finite_pairs, StatisticalSense};
use crate::brief::{distinct_count, mean, median_of, sample_variance};
use crate::distributions::{cohen_d, t_test_p_value};
use crate::types::{SenseResult, Signal, VariableKey};

pub(crate) const NAME: &str = "welch_ttest";

const MIN_SAMPLES: usize = 4;
const MIN_GROUP_SIZE: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grouping {
    BinaryX,
    BinaryY,
    MedianSplitX,
}

impl Grouping {
    fn as_str(&self) -> &'static str {
        match self {
            Grouping::BinaryX => "binary_x",
            Grouping::BinaryY => "binary_y",
            Grouping::MedianSplitX => "median_split_x",
        }
    }
}

/// Welch statistic with Welch-Satterthwaite degrees of freedom
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WelchOutcome {
    pub t_statistic: f64,
    pub degrees_of_freedom: f64,
    pub p_value: f64,
}

/// `high` minus `low`; t = 0, p = 1 when both groups are constant
pub(crate) fn welch_t_test(high: &[f64], low: &[f64]) -> WelchOutcome {
    let (n1, n2) = (high.len() as f64, low.len() as f64);
    let se1 = sample_variance(high) / n1;
    let se2 = sample_variance(low) / n2;
    let se_sum = se1 + se2;

    if high.len() < 2 || low.len() < 2 || !(se_sum > 0.0) {
        return WelchOutcome {
            t_statistic: 0.0,
            degrees_of_freedom: (n1 + n2 - 2.0).max(0.0),
            p_value: 1.0,
        };
    }

    let t_statistic = (mean(high) - mean(low)) / se_sum.sqrt();
    let degrees_of_freedom =
        se_sum * se_sum / (se1 * se1 / (n1 - 1.0) + se2 * se2 / (n2 - 1.0));

    WelchOutcome {
        t_statistic,
        degrees_of_freedom,
        p_value: t_test_p_value(t_statistic, degrees_of_freedom),
    }
}

/// Split `values` by a two-level `labels` series: (values at the higher label, at the lower)
fn split_by_binary(labels: &[f64], values: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let threshold = labels.iter().copied().fold(f64::INFINITY, f64::min);
    let mut high = Vec::new();
    let mut low = Vec::new();
    for (&label, &value) in labels.iter().zip(values) {
        if label > threshold {
            high.push(value);
        } else {
            low.push(value);
        }
    }
    (high, low)
}

fn derive_groups(x: &[f64], y: &[f64]) -> (Grouping, Vec<f64>, Vec<f64>) {
    if distinct_count(x) == 2 {
        let (high, low) = split_by_binary(x, y);
        return (Grouping::BinaryX, high, low);
    }
    if distinct_count(y) == 2 {
        let (high, low) = split_by_binary(y, x);
        return (Grouping::BinaryY, high, low);
    }

    let median = median_of(x);
    let mut high = Vec::new();
    let mut low = Vec::new();
    for (&a, &b) in x.iter().zip(y) {
        if a > median {
            high.push(b);
        } else {
            low.push(b);
        }
    }
    (Grouping::MedianSplitX, high, low)
}

fn classify(d: f64, p_value: f64, alpha: f64) -> Signal {
    if p_value > alpha {
        return Signal::Weak;
    }
    let magnitude = d.abs();
    if magnitude >= 0.8 {
        Signal::Strong
    } else if magnitude >= 0.5 {
        Signal::Moderate
    } else {
        Signal::Weak
    }
}

#[derive(Debug, Clone)]
pub struct WelchTTestSense {
    alpha: f64,
}

impl WelchTTestSense {
    pub fn new(alpha: f64) -> Self {
        Self { alpha }
    }
}

impl StatisticalSense for WelchTTestSense {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> String {
        "Compares means assuming unequal variances (robust to heteroscedasticity)".to_string()
    }

    fn requires_groups(&self) -> bool {
        true
    }

    fn analyze(&self, x: &[f64], y: &[f64], _var_x: &VariableKey, _var_y: &VariableKey) -> SenseResult {
        let (x, y) = match finite_pairs(x, y) {
            Some(pairs) if pairs.0.len() >= MIN_SAMPLES => pairs,
            _ => return SenseResult::insufficient(NAME, "Insufficient data for Welch t-test"),
        };

        let (grouping, high, low) = derive_groups(&x, &y);
        if high.len() < MIN_GROUP_SIZE || low.len() < MIN_GROUP_SIZE {
            return SenseResult::insufficient(NAME, "Requires two groups with at least two values each")
                .with_metadata("grouping", grouping.as_str());
        }

        let outcome = welch_t_test(&high, &low);
        let d = cohen_d(
            mean(&high),
            mean(&low),
            sample_variance(&high).sqrt(),
            sample_variance(&low).sqrt(),
            high.len(),
            low.len(),
        );
        let signal = classify(d, outcome.p_value, self.alpha);

        let description = if outcome.p_value > self.alpha {
            format!(
                "No significant mean difference between groups (d={:.3}, p={:.3})",
                d, outcome.p_value
            )
        } else {
            format!(
                "Group means differ (Welch t={:.3}, d={:.3}, p={:.3})",
                outcome.t_statistic, d, outcome.p_value
            )
        };

        SenseResult::new(NAME, d, outcome.p_value, signal, description)
            .with_metadata("grouping", grouping.as_str())
            .with_metadata("t_statistic", outcome.t_statistic)
            .with_metadata("degrees_of_freedom", outcome.degrees_of_freedom)
            .with_metadata("group_sizes", vec![high.len(), low.len()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> (VariableKey, VariableKey) {
        (VariableKey::from("group"), VariableKey::from("value"))
    }

    #[test]
    fn test_welch_known_values() {
        let high = [5.0, 6.0, 7.0, 8.0, 9.0];
        let low = [1.0, 2.0, 3.0, 4.0, 5.0];
        let outcome = welch_t_test(&high, &low);
        // Equal variances and sizes: same t as the pooled test, df = 8
        assert!((outcome.t_statistic - 4.0).abs() < 1e-12);
        assert!((outcome.degrees_of_freedom - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_unequal_variance_degrees_of_freedom() {
        let high = [10.0, 20.0, 30.0, 40.0, 50.0];
        let low = [1.0, 2.0, 3.0];
        let outcome = welch_t_test(&high, &low);
        assert!(outcome.degrees_of_freedom < 6.0);
        assert!(outcome.degrees_of_freedom > 4.0);
    }

    #[test]
    fn test_binary_x_groups_y() {
        let x = [0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0];
        let y = [1.0, 10.0, 1.5, 11.0, 0.5, 10.5, 1.2, 9.8];
        let (vx, vy) = keys();

        let result = WelchTTestSense::new(0.05).analyze(&x, &y, &vx, &vy);
        assert_eq!(result.metadata["grouping"], "binary_x");
        assert!(result.effect_size > 0.8);
        assert!(result.p_value < 0.001);
        assert_eq!(result.signal, Signal::Strong);
    }

    #[test]
    fn test_median_split_when_nothing_is_binary() {
        let x: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| if *v >= 10.0 { 5.0 + v * 0.01 } else { v * 0.01 }).collect();
        let (vx, vy) = keys();

        let result = WelchTTestSense::new(0.05).analyze(&x, &y, &vx, &vy);
        assert_eq!(result.metadata["grouping"], "median_split_x");
        assert_eq!(result.metadata["group_sizes"], serde_json::json!([10, 10]));
        assert!(result.p_value < 0.001);
    }

    #[test]
    fn test_guards() {
        let (vx, vy) = keys();
        let sense = WelchTTestSense::new(0.05);
        assert!(sense.requires_groups());

        let short = sense.analyze(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0], &vx, &vy);
        assert_eq!(short.p_value, 1.0);

        // One member in the high group
        let lopsided = sense.analyze(&[0.0, 0.0, 0.0, 0.0, 1.0], &[1.0, 2.0, 3.0, 4.0, 5.0], &vx, &vy);
        assert_eq!(lopsided.p_value, 1.0);
        assert_eq!(lopsided.metadata["grouping"], "binary_x");
    }
}

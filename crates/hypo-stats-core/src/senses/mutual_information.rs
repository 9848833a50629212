//! Mutual information (Kraskov-Stogbauer-Grassberger style)
//!
//! For each point the distance to its k-th nearest neighbour is taken under
//! the max norm in joint space, and the points within that radius are counted
//! in each marginal. The estimate averages `ln n - ln n_x - ln n_y + ln k`
//! (log in place of digamma) and is floored at zero.

use super::{classify_signal, finite_pairs, StatisticalSense};
use crate::types::{SenseResult, VariableKey};

pub(crate) const NAME: &str = "mutual_information";

const MIN_SAMPLES: usize = 10;
/// MI (nats) at which the pseudo p-value reaches zero
const MI_SATURATION: f64 = 2.0;
const BANDS: [f64; 3] = [1.0, 0.5, 0.2];

#[derive(Debug, Clone)]
pub struct MutualInformationSense {
    k: usize,
    alpha: f64,
}

impl MutualInformationSense {
    pub fn new(k: usize, alpha: f64) -> Self {
        Self { k: k.max(1), alpha }
    }
}

/// KSG estimate in nats; 0.0 below five points
pub(crate) fn ksg_mutual_information(x: &[f64], y: &[f64], k: usize) -> f64 {
    let n = x.len().min(y.len());
    if n < 5 {
        return 0.0;
    }

    let ln_n = (n as f64).ln();
    let ln_k = (k as f64).ln();
    let mut distances = vec![0.0; n];
    let mut total = 0.0;

    for i in 0..n {
        for j in 0..n {
            distances[j] = (x[j] - x[i]).abs().max((y[j] - y[i]).abs());
        }
        // Index 0 is the point itself
        let rank = k.min(n - 1);
        let (_, radius, _) = distances.select_nth_unstable_by(rank, |a, b| a.total_cmp(b));
        let radius = *radius;

        let nx = x[..n].iter().filter(|v| (*v - x[i]).abs() <= radius).count();
        let ny = y[..n].iter().filter(|v| (*v - y[i]).abs() <= radius).count();
        if nx > 0 && ny > 0 {
            total += ln_n - (nx as f64).ln() - (ny as f64).ln() + ln_k;
        }
    }

    (total / n as f64).max(0.0)
}

/// Monotone transform of MI, not a calibrated test
fn pseudo_p_value(mi: f64) -> f64 {
    if mi <= 0.0 {
        return 1.0;
    }
    1.0 - (mi / MI_SATURATION).min(1.0)
}

impl StatisticalSense for MutualInformationSense {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> String {
        "Detects non-linear relationships robust to complex dependencies".to_string()
    }

    fn analyze(&self, x: &[f64], y: &[f64], _var_x: &VariableKey, _var_y: &VariableKey) -> SenseResult {
        let (x, y) = match finite_pairs(x, y) {
            Some(pairs) if pairs.0.len() >= MIN_SAMPLES => pairs,
            _ => {
                return SenseResult::insufficient(
                    NAME,
                    "Insufficient data for mutual information analysis",
                )
            }
        };

        let mi = ksg_mutual_information(&x, &y, self.k);
        let p_value = pseudo_p_value(mi);
        let signal = classify_signal(mi, p_value, self.alpha, BANDS);

        let description = if p_value > self.alpha {
            format!(
                "No significant mutual information detected (MI={:.3}, p={:.3})",
                mi, p_value
            )
        } else {
            format!(
                "Mutual information suggests non-linear relationship (MI={:.3}, p={:.3})",
                mi, p_value
            )
        };

        SenseResult::new(NAME, mi, p_value, signal, description)
            .with_metadata("estimator", "ksg")
            .with_metadata("k_neighbors", self.k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Signal;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn keys() -> (VariableKey, VariableKey) {
        (VariableKey::from("x"), VariableKey::from("y"))
    }

    #[test]
    fn test_linear_dependence_saturates() {
        let x: Vec<f64> = (0..200).map(|i| i as f64 / 20.0).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 1.0).collect();
        let (vx, vy) = keys();

        let result = MutualInformationSense::new(5, 0.05).analyze(&x, &y, &vx, &vy);
        assert!(result.effect_size > 2.0, "mi = {}", result.effect_size);
        assert_eq!(result.p_value, 0.0);
        assert_eq!(result.signal, Signal::VeryStrong);
        assert_eq!(result.metadata["estimator"], "ksg");
        assert_eq!(result.metadata["k_neighbors"], 5);
    }

    #[test]
    fn test_non_linear_dependence_scores_high() {
        let x: Vec<f64> = (0..200).map(|i| i as f64 / 20.0).collect();
        let y: Vec<f64> = x.iter().map(|v| (v * 2.0).sin()).collect();
        let mi = ksg_mutual_information(&x, &y, 5);
        assert!(mi > 0.8, "mi = {}", mi);
    }

    #[test]
    fn test_independent_noise_is_weak() {
        let mut rng = StdRng::seed_from_u64(3);
        let x: Vec<f64> = (0..200).map(|_| rng.gen_range(0.0..1.0)).collect();
        let y: Vec<f64> = (0..200).map(|_| rng.gen_range(0.0..1.0)).collect();

        let mi = ksg_mutual_information(&x, &y, 5);
        assert!(mi < 0.3, "mi = {}", mi);
        let (vx, vy) = keys();
        let result = MutualInformationSense::new(5, 0.05).analyze(&x, &y, &vx, &vy);
        assert_eq!(result.signal, Signal::Weak);
    }

    #[test]
    fn test_insufficient_data() {
        let (vx, vy) = keys();
        let result = MutualInformationSense::new(5, 0.05).analyze(&[1.0; 9], &[2.0; 9], &vx, &vy);
        assert_eq!(result.p_value, 1.0);
        assert!(result.description.starts_with("Insufficient data"));
    }

    #[test]
    fn test_pseudo_p_value() {
        assert_eq!(pseudo_p_value(0.0), 1.0);
        assert!((pseudo_p_value(0.5) - 0.75).abs() < 1e-12);
        assert_eq!(pseudo_p_value(3.0), 0.0);
    }
}
